//! Mnemonic name tables.
//!
//! An opcode property stores an 8-bit mnemonic index. The index is resolved
//! against the name table of the opcode table it came from, so each table
//! family below stays well under 256 names. Names ending in `cc` are
//! condition-code families whose suffix comes from the opcode's low nibble.

macro_rules! mnemonics {
    (
        $(#[$meta:meta])*
        $family:ident => $names:ident {
            $($variant:ident = $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub(crate) enum $family {
            $($variant),+
        }

        pub(crate) static $names: &[&str] = &[$($text),+];
    };
}

mnemonics! {
    /// One-byte opcode map, including its groups and the x87 escapes.
    Map0 => MAP0_NAMES {
        Add = "add", Or = "or", Adc = "adc", Sbb = "sbb",
        And = "and", Sub = "sub", Xor = "xor", Cmp = "cmp",
        Push = "push", Pop = "pop", Movsxd = "movsxd", Imul = "imul",
        Ins = "ins", Outs = "outs", Jcc = "jcc", Test = "test",
        Xchg = "xchg", Mov = "mov", Lea = "lea", Cwde = "cwde",
        Cdq = "cdq", Fwait = "fwait", Pushf = "pushfq", Popf = "popfq",
        Sahf = "sahf", Lahf = "lahf", Movs = "movs", Cmps = "cmps",
        Stos = "stos", Lods = "lods", Scas = "scas", Rol = "rol",
        Ror = "ror", Rcl = "rcl", Rcr = "rcr", Shl = "shl",
        Shr = "shr", Sal = "sal", Sar = "sar", Ret = "ret",
        Enter = "enter", Leave = "leave", Retf = "retf", Int3 = "int3",
        Int = "int", Iret = "iretq", Xlat = "xlatb", Loopne = "loopne",
        Loope = "loope", Loop = "loop", Jrcxz = "jrcxz", In = "in",
        Out = "out", Call = "call", Jmp = "jmp", Int1 = "int1",
        Hlt = "hlt", Cmc = "cmc", Not = "not", Neg = "neg",
        Mul = "mul", Div = "div", Idiv = "idiv", Clc = "clc",
        Stc = "stc", Cli = "cli", Sti = "sti", Cld = "cld",
        Std = "std", Inc = "inc", Dec = "dec", CallFar = "lcall",
        JmpFar = "ljmp", Xabort = "xabort", Xbegin = "xbegin",
        Fadd = "fadd", Fmul = "fmul", Fcom = "fcom", Fcomp = "fcomp",
        Fsub = "fsub", Fsubr = "fsubr", Fdiv = "fdiv", Fdivr = "fdivr",
        Fld = "fld", Fst = "fst", Fstp = "fstp", Fldenv = "fldenv",
        Fldcw = "fldcw", Fnstenv = "fnstenv", Fnstcw = "fnstcw", Fiadd = "fiadd",
        Fimul = "fimul", Ficom = "ficom", Ficomp = "ficomp", Fisub = "fisub",
        Fisubr = "fisubr", Fidiv = "fidiv", Fidivr = "fidivr", Fild = "fild",
        Fisttp = "fisttp", Fist = "fist", Fistp = "fistp", Frstor = "frstor",
        Fnsave = "fnsave", Fnstsw = "fnstsw", Fbld = "fbld", Fbstp = "fbstp",
        Fxch = "fxch", Fcmovb = "fcmovb", Fcmove = "fcmove", Fcmovbe = "fcmovbe",
        Fcmovu = "fcmovu", Fcmovnb = "fcmovnb", Fcmovne = "fcmovne", Fcmovnbe = "fcmovnbe",
        Fcmovnu = "fcmovnu", Fucomi = "fucomi", Fcomi = "fcomi", Ffree = "ffree",
        Fucom = "fucom", Fucomp = "fucomp", Faddp = "faddp", Fmulp = "fmulp",
        Fsubrp = "fsubrp", Fsubp = "fsubp", Fdivrp = "fdivrp", Fdivp = "fdivp",
        Fucomip = "fucomip", Fcomip = "fcomip", Fstp1 = "fstp1", Fxch4 = "fxch4",
        Fcom2 = "fcom2", Fcomp3 = "fcomp3", Fcomp5 = "fcomp5", Ffreep = "ffreep",
        Fxch7 = "fxch7", Fstp8 = "fstp8", Fstp9 = "fstp9", X87Fixed = "(bad)",
    }
}

mnemonics! {
    /// Two-byte map without a mandatory prefix. Also covers the legacy
    /// (non-SSE) instructions that ignore a `66`, `F2` or `F3` prefix.
    Map1 => MAP1_NAMES {
        Lar = "lar", Lsl = "lsl", Syscall = "syscall", Clts = "clts",
        Sysret = "sysretq", Invd = "invd", Wbinvd = "wbinvd", Ud2 = "ud2",
        Movups = "movups", Movlps = "movlps", Unpcklps = "unpcklps", Unpckhps = "unpckhps",
        Movhps = "movhps", Nop = "nop", Mov = "mov", Movaps = "movaps",
        Cvtpi2ps = "cvtpi2ps", Movntps = "movntps", Cvttps2pi = "cvttps2pi", Cvtps2pi = "cvtps2pi",
        Ucomiss = "ucomiss", Comiss = "comiss", Wrmsr = "wrmsr", Rdtsc = "rdtsc",
        Rdmsr = "rdmsr", Rdpmc = "rdpmc", Sysenter = "sysenter", Sysexit = "sysexit",
        Getsec = "getsec", Cmovcc = "cmovcc", Movmskps = "movmskps", Sqrtps = "sqrtps",
        Rsqrtps = "rsqrtps", Rcpps = "rcpps", Andps = "andps", Andnps = "andnps",
        Orps = "orps", Xorps = "xorps", Addps = "addps", Mulps = "mulps",
        Cvtps2pd = "cvtps2pd", Cvtdq2ps = "cvtdq2ps", Subps = "subps", Minps = "minps",
        Divps = "divps", Maxps = "maxps", Punpcklbw = "punpcklbw", Punpcklwd = "punpcklwd",
        Punpckldq = "punpckldq", Packsswb = "packsswb", Pcmpgtb = "pcmpgtb", Pcmpgtw = "pcmpgtw",
        Pcmpgtd = "pcmpgtd", Packuswb = "packuswb", Punpckhbw = "punpckhbw", Punpckhwd = "punpckhwd",
        Punpckhdq = "punpckhdq", Packssdw = "packssdw", Movd = "movd", Movq = "movq",
        Pshufw = "pshufw", Pcmpeqb = "pcmpeqb", Pcmpeqw = "pcmpeqw", Pcmpeqd = "pcmpeqd",
        Emms = "emms", Vmread = "vmread", Vmwrite = "vmwrite", Jcc = "jcc",
        Setcc = "setcc", Push = "push", Pop = "pop", Cpuid = "cpuid",
        Bt = "bt", Shld = "shld", Rsm = "rsm", Bts = "bts",
        Shrd = "shrd", Imul = "imul", Cmpxchg = "cmpxchg", Lss = "lss",
        Btr = "btr", Lfs = "lfs", Lgs = "lgs", Movzx = "movzx",
        Ud1 = "ud1", Btc = "btc", Bsf = "bsf", Bsr = "bsr",
        Movsx = "movsx", Xadd = "xadd", Cmpps = "cmpps", Movnti = "movnti",
        Pinsrw = "pinsrw", Pextrw = "pextrw", Shufps = "shufps", Bswap = "bswap",
        Psrlw = "psrlw", Psrld = "psrld", Psrlq = "psrlq", Paddq = "paddq",
        Pmullw = "pmullw", Pmovmskb = "pmovmskb", Psubusb = "psubusb", Psubusw = "psubusw",
        Pminub = "pminub", Pand = "pand", Paddusb = "paddusb", Paddusw = "paddusw",
        Pmaxub = "pmaxub", Pandn = "pandn", Pavgb = "pavgb", Psraw = "psraw",
        Psrad = "psrad", Pavgw = "pavgw", Pmulhuw = "pmulhuw", Pmulhw = "pmulhw",
        Movntq = "movntq", Psubsb = "psubsb", Psubsw = "psubsw", Pminsw = "pminsw",
        Por = "por", Paddsb = "paddsb", Paddsw = "paddsw", Pmaxsw = "pmaxsw",
        Pxor = "pxor", Psllw = "psllw", Pslld = "pslld", Psllq = "psllq",
        Pmuludq = "pmuludq", Pmaddwd = "pmaddwd", Psadbw = "psadbw", Maskmovq = "maskmovq",
        Psubb = "psubb", Psubw = "psubw", Psubd = "psubd", Psubq = "psubq",
        Paddb = "paddb", Paddw = "paddw", Paddd = "paddd", Ud0 = "ud0",
    }
}

mnemonics! {
    /// Two-byte map with mandatory `66`.
    Map1Op => MAP1_OP_NAMES {
        Movupd = "movupd", Movlpd = "movlpd", Unpcklpd = "unpcklpd", Unpckhpd = "unpckhpd",
        Movhpd = "movhpd", Movapd = "movapd", Cvtpi2pd = "cvtpi2pd", Movntpd = "movntpd",
        Cvttpd2pi = "cvttpd2pi", Cvtpd2pi = "cvtpd2pi", Ucomisd = "ucomisd", Comisd = "comisd",
        Movmskpd = "movmskpd", Sqrtpd = "sqrtpd", Andpd = "andpd", Andnpd = "andnpd",
        Orpd = "orpd", Xorpd = "xorpd", Addpd = "addpd", Mulpd = "mulpd",
        Cvtpd2ps = "cvtpd2ps", Cvtps2dq = "cvtps2dq", Subpd = "subpd", Minpd = "minpd",
        Divpd = "divpd", Maxpd = "maxpd", Punpcklbw = "punpcklbw", Punpcklwd = "punpcklwd",
        Punpckldq = "punpckldq", Packsswb = "packsswb", Pcmpgtb = "pcmpgtb", Pcmpgtw = "pcmpgtw",
        Pcmpgtd = "pcmpgtd", Packuswb = "packuswb", Punpckhbw = "punpckhbw", Punpckhwd = "punpckhwd",
        Punpckhdq = "punpckhdq", Packssdw = "packssdw", Punpcklqdq = "punpcklqdq", Punpckhqdq = "punpckhqdq",
        Movd = "movd", Movdqa = "movdqa", Pshufd = "pshufd", Pcmpeqb = "pcmpeqb",
        Pcmpeqw = "pcmpeqw", Pcmpeqd = "pcmpeqd", Extrq = "extrq", Haddpd = "haddpd",
        Hsubpd = "hsubpd", Cmppd = "cmppd", Pinsrw = "pinsrw", Pextrw = "pextrw",
        Shufpd = "shufpd", Addsubpd = "addsubpd", Psrlw = "psrlw", Psrld = "psrld",
        Psrlq = "psrlq", Paddq = "paddq", Pmullw = "pmullw", Movq = "movq",
        Pmovmskb = "pmovmskb", Psubusb = "psubusb", Psubusw = "psubusw", Pminub = "pminub",
        Pand = "pand", Paddusb = "paddusb", Paddusw = "paddusw", Pmaxub = "pmaxub",
        Pandn = "pandn", Pavgb = "pavgb", Psraw = "psraw", Psrad = "psrad",
        Pavgw = "pavgw", Pmulhuw = "pmulhuw", Pmulhw = "pmulhw", Cvttpd2dq = "cvttpd2dq",
        Movntdq = "movntdq", Psubsb = "psubsb", Psubsw = "psubsw", Pminsw = "pminsw",
        Por = "por", Paddsb = "paddsb", Paddsw = "paddsw", Pmaxsw = "pmaxsw",
        Pxor = "pxor", Psllw = "psllw", Pslld = "pslld", Psllq = "psllq",
        Pmuludq = "pmuludq", Pmaddwd = "pmaddwd", Psadbw = "psadbw", Maskmovdqu = "maskmovdqu",
        Psubb = "psubb", Psubw = "psubw", Psubd = "psubd", Psubq = "psubq",
        Paddb = "paddb", Paddw = "paddw", Paddd = "paddd",
    }
}

mnemonics! {
    /// Two-byte map with mandatory `F3`.
    Map1Rep => MAP1_REP_NAMES {
        Movss = "movss", Movsldup = "movsldup", Movshdup = "movshdup", Cvtsi2ss = "cvtsi2ss",
        Cvttss2si = "cvttss2si", Cvtss2si = "cvtss2si", Sqrtss = "sqrtss", Rsqrtss = "rsqrtss",
        Rcpss = "rcpss", Addss = "addss", Mulss = "mulss", Cvtss2sd = "cvtss2sd",
        Cvttps2dq = "cvttps2dq", Subss = "subss", Minss = "minss", Divss = "divss",
        Maxss = "maxss", Movdqu = "movdqu", Pshufhw = "pshufhw", Movq = "movq",
        Popcnt = "popcnt", Tzcnt = "tzcnt", Lzcnt = "lzcnt", Cmpss = "cmpss",
        Movq2dq = "movq2dq", Cvtdq2pd = "cvtdq2pd",
    }
}

mnemonics! {
    /// Two-byte map with mandatory `F2`.
    Map1Repne => MAP1_REPNE_NAMES {
        Movsd = "movsd", Movddup = "movddup", Cvtsi2sd = "cvtsi2sd", Cvttsd2si = "cvttsd2si",
        Cvtsd2si = "cvtsd2si", Sqrtsd = "sqrtsd", Addsd = "addsd", Mulsd = "mulsd",
        Cvtsd2ss = "cvtsd2ss", Subsd = "subsd", Minsd = "minsd", Divsd = "divsd",
        Maxsd = "maxsd", Pshuflw = "pshuflw", Insertq = "insertq", Haddps = "haddps",
        Hsubps = "hsubps", Cmpsd = "cmpsd", Addsubps = "addsubps", Movdq2q = "movdq2q",
        Cvtpd2dq = "cvtpd2dq", Lddqu = "lddqu",
    }
}

mnemonics! {
    /// Two-byte map opcode groups.
    Map1Group => MAP1_GROUP_NAMES {
        Sldt = "sldt", Str = "str", Lldt = "lldt", Ltr = "ltr",
        Verr = "verr", Verw = "verw", Sgdt = "sgdt", Sidt = "sidt",
        Lgdt = "lgdt", Lidt = "lidt", Smsw = "smsw", Lmsw = "lmsw",
        Invlpg = "invlpg", System = "(bad)", Prefetch = "prefetch", Prefetchw = "prefetchw",
        Prefetchnta = "prefetchnta", Prefetcht0 = "prefetcht0", Prefetcht1 = "prefetcht1",
        Prefetcht2 = "prefetcht2", Nop = "nop", Psrlw = "psrlw", Psraw = "psraw",
        Psllw = "psllw", Psrld = "psrld", Psrad = "psrad", Pslld = "pslld",
        Psrlq = "psrlq", Psrldq = "psrldq", Psllq = "psllq", Pslldq = "pslldq",
        Fxsave = "fxsave", Fxrstor = "fxrstor", Ldmxcsr = "ldmxcsr", Stmxcsr = "stmxcsr",
        Xsave = "xsave", Xrstor = "xrstor", Xsaveopt = "xsaveopt", Clflush = "clflush",
        Lfence = "lfence", Mfence = "mfence", Sfence = "sfence", Rdfsbase = "rdfsbase",
        Rdgsbase = "rdgsbase", Wrfsbase = "wrfsbase", Wrgsbase = "wrgsbase", Clwb = "clwb",
        Clflushopt = "clflushopt", Bt = "bt", Bts = "bts", Btr = "btr",
        Btc = "btc", Cmpxchg8b = "cmpxchg8b", Xrstors = "xrstors", Xsavec = "xsavec",
        Xsaves = "xsaves", Vmptrld = "vmptrld", Vmptrst = "vmptrst", Rdrand = "rdrand",
        Rdseed = "rdseed", Vmclear = "vmclear", Vmxon = "vmxon", Rdpid = "rdpid",
        Extrq = "extrq",
    }
}

mnemonics! {
    /// Three-byte map `0F 38`, legacy encodings.
    Map2 => MAP2_NAMES {
        Pshufb = "pshufb", Phaddw = "phaddw", Phaddd = "phaddd", Phaddsw = "phaddsw",
        Pmaddubsw = "pmaddubsw", Phsubw = "phsubw", Phsubd = "phsubd", Phsubsw = "phsubsw",
        Psignb = "psignb", Psignw = "psignw", Psignd = "psignd", Pmulhrsw = "pmulhrsw",
        Pblendvb = "pblendvb", Blendvps = "blendvps", Blendvpd = "blendvpd", Ptest = "ptest",
        Pabsb = "pabsb", Pabsw = "pabsw", Pabsd = "pabsd", Pmovsxbw = "pmovsxbw",
        Pmovsxbd = "pmovsxbd", Pmovsxbq = "pmovsxbq", Pmovsxwd = "pmovsxwd", Pmovsxwq = "pmovsxwq",
        Pmovsxdq = "pmovsxdq", Pmuldq = "pmuldq", Pcmpeqq = "pcmpeqq", Movntdqa = "movntdqa",
        Packusdw = "packusdw", Pmovzxbw = "pmovzxbw", Pmovzxbd = "pmovzxbd", Pmovzxbq = "pmovzxbq",
        Pmovzxwd = "pmovzxwd", Pmovzxwq = "pmovzxwq", Pmovzxdq = "pmovzxdq", Pcmpgtq = "pcmpgtq",
        Pminsb = "pminsb", Pminsd = "pminsd", Pminuw = "pminuw", Pminud = "pminud",
        Pmaxsb = "pmaxsb", Pmaxsd = "pmaxsd", Pmaxuw = "pmaxuw", Pmaxud = "pmaxud",
        Pmulld = "pmulld", Phminposuw = "phminposuw", Invept = "invept", Invvpid = "invvpid",
        Invpcid = "invpcid", Sha1nexte = "sha1nexte", Sha1msg1 = "sha1msg1", Sha1msg2 = "sha1msg2",
        Sha256rnds2 = "sha256rnds2", Sha256msg1 = "sha256msg1", Sha256msg2 = "sha256msg2",
        Gf2p8mulb = "gf2p8mulb", Aesimc = "aesimc", Aesenc = "aesenc", Aesenclast = "aesenclast",
        Aesdec = "aesdec", Aesdeclast = "aesdeclast", Movbe = "movbe", Crc32 = "crc32",
        Adcx = "adcx", Adox = "adox", Movdiri = "movdiri", Movdir64b = "movdir64b",
    }
}

mnemonics! {
    /// Three-byte map `0F 3A`, legacy encodings.
    Map3 => MAP3_NAMES {
        Roundps = "roundps", Roundpd = "roundpd", Roundss = "roundss", Roundsd = "roundsd",
        Blendps = "blendps", Blendpd = "blendpd", Pblendw = "pblendw", Palignr = "palignr",
        Pextrb = "pextrb", Pextrw = "pextrw", Pextrd = "pextrd", Extractps = "extractps",
        Pinsrb = "pinsrb", Insertps = "insertps", Pinsrd = "pinsrd", Dpps = "dpps",
        Dppd = "dppd", Mpsadbw = "mpsadbw", Pclmulqdq = "pclmulqdq", Pcmpestrm = "pcmpestrm",
        Pcmpestri = "pcmpestri", Pcmpistrm = "pcmpistrm", Pcmpistri = "pcmpistri",
        Gf2p8affineqb = "gf2p8affineqb", Gf2p8affineinvqb = "gf2p8affineinvqb",
        Aeskeygenassist = "aeskeygenassist", Sha1rnds4 = "sha1rnds4", Hreset = "hreset",
    }
}

mnemonics! {
    /// VEX map 1 instructions with no legacy counterpart. Names are complete.
    VexMap1 => VEX_MAP1_NAMES {
        Kand = "kand", Kandn = "kandn", Knot = "knot", Kor = "kor",
        Kxnor = "kxnor", Kxor = "kxor", Kadd = "kadd", Kunpck = "kunpck",
        Vzeroupper = "vzeroupper", Kmov = "kmov", Kortest = "kortest", Ktest = "ktest",
        Vpsrlw = "vpsrlw", Vpsraw = "vpsraw", Vpsllw = "vpsllw", Vpsrld = "vpsrld",
        Vpsrad = "vpsrad", Vpslld = "vpslld", Vpsrlq = "vpsrlq", Vpsrldq = "vpsrldq",
        Vpsllq = "vpsllq", Vpslldq = "vpslldq", Vldmxcsr = "vldmxcsr", Vstmxcsr = "vstmxcsr",
    }
}

mnemonics! {
    /// VEX map 2 instructions with no legacy counterpart. FMA names take
    /// their final `s`/`d` from VEX.W.
    VexMap2 => VEX_MAP2_NAMES {
        Vpermilps = "vpermilps", Vpermilpd = "vpermilpd", Vtestps = "vtestps", Vtestpd = "vtestpd",
        Vcvtph2ps = "vcvtph2ps", Vpermps = "vpermps", Vbroadcastss = "vbroadcastss",
        Vbroadcastsd = "vbroadcastsd", Vbroadcastf128 = "vbroadcastf128", Vmaskmovps = "vmaskmovps",
        Vmaskmovpd = "vmaskmovpd", Vpermd = "vpermd", Vpsrlvd = "vpsrlvd", Vpsravd = "vpsravd",
        Vpsllvd = "vpsllvd", Vpbroadcastd = "vpbroadcastd", Vpbroadcastq = "vpbroadcastq",
        Vbroadcasti128 = "vbroadcasti128", Vpbroadcastb = "vpbroadcastb", Vpbroadcastw = "vpbroadcastw",
        Vpmaskmovd = "vpmaskmovd", Vpgatherdd = "vpgatherdd", Vpgatherqd = "vpgatherqd",
        Vgatherdps = "vgatherdps", Vgatherqps = "vgatherqps",
        Vfmaddsub132 = "vfmaddsub132p", Vfmsubadd132 = "vfmsubadd132p",
        Vfmadd132p = "vfmadd132p", Vfmadd132s = "vfmadd132s", Vfmsub132p = "vfmsub132p",
        Vfmsub132s = "vfmsub132s", Vfnmadd132p = "vfnmadd132p", Vfnmadd132s = "vfnmadd132s",
        Vfnmsub132p = "vfnmsub132p", Vfnmsub132s = "vfnmsub132s",
        Vfmaddsub213 = "vfmaddsub213p", Vfmsubadd213 = "vfmsubadd213p",
        Vfmadd213p = "vfmadd213p", Vfmadd213s = "vfmadd213s", Vfmsub213p = "vfmsub213p",
        Vfmsub213s = "vfmsub213s", Vfnmadd213p = "vfnmadd213p", Vfnmadd213s = "vfnmadd213s",
        Vfnmsub213p = "vfnmsub213p", Vfnmsub213s = "vfnmsub213s",
        Vfmaddsub231 = "vfmaddsub231p", Vfmsubadd231 = "vfmsubadd231p",
        Vfmadd231p = "vfmadd231p", Vfmadd231s = "vfmadd231s", Vfmsub231p = "vfmsub231p",
        Vfmsub231s = "vfmsub231s", Vfnmadd231p = "vfnmadd231p", Vfnmadd231s = "vfnmadd231s",
        Vfnmsub231p = "vfnmsub231p", Vfnmsub231s = "vfnmsub231s",
        Andn = "andn", Blsr = "blsr", Blsmsk = "blsmsk", Blsi = "blsi",
        Bzhi = "bzhi", Pext = "pext", Pdep = "pdep", Mulx = "mulx",
        Bextr = "bextr", Shlx = "shlx", Sarx = "sarx", Shrx = "shrx",
    }
}

mnemonics! {
    /// VEX map 3 instructions with no legacy counterpart.
    VexMap3 => VEX_MAP3_NAMES {
        Vpermq = "vpermq", Vpermpd = "vpermpd", Vpblendd = "vpblendd", Vpermilps = "vpermilps",
        Vpermilpd = "vpermilpd", Vperm2f128 = "vperm2f128", Vinsertf128 = "vinsertf128",
        Vextractf128 = "vextractf128", Vcvtps2ph = "vcvtps2ph", Kshiftr = "kshiftr",
        Kshiftl = "kshiftl", Vinserti128 = "vinserti128", Vextracti128 = "vextracti128",
        Vperm2i128 = "vperm2i128", Vblendvps = "vblendvps", Vblendvpd = "vblendvpd",
        Vpblendvb = "vpblendvb", Rorx = "rorx",
    }
}

/// Identifies the name table a mnemonic index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameTable {
    Map0,
    Map1,
    Map1Op,
    Map1Rep,
    Map1Repne,
    Map1Group,
    Map2,
    Map3,
    VexMap1,
    VexMap2,
    VexMap3,
}

impl NameTable {
    pub fn names(self) -> &'static [&'static str] {
        match self {
            NameTable::Map0 => MAP0_NAMES,
            NameTable::Map1 => MAP1_NAMES,
            NameTable::Map1Op => MAP1_OP_NAMES,
            NameTable::Map1Rep => MAP1_REP_NAMES,
            NameTable::Map1Repne => MAP1_REPNE_NAMES,
            NameTable::Map1Group => MAP1_GROUP_NAMES,
            NameTable::Map2 => MAP2_NAMES,
            NameTable::Map3 => MAP3_NAMES,
            NameTable::VexMap1 => VEX_MAP1_NAMES,
            NameTable::VexMap2 => VEX_MAP2_NAMES,
            NameTable::VexMap3 => VEX_MAP3_NAMES,
        }
    }

    /// Resolves a mnemonic index, or `None` when it is out of range.
    pub fn get(self, index: u8) -> Option<&'static str> {
        self.names().get(usize::from(index)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_order_matches_names() {
        assert_eq!(MAP0_NAMES[Map0::Add as usize], "add");
        assert_eq!(MAP0_NAMES[Map0::X87Fixed as usize], "(bad)");
        assert_eq!(MAP1_NAMES[Map1::Ud0 as usize], "ud0");
        assert_eq!(MAP1_OP_NAMES[Map1Op::Paddd as usize], "paddd");
        assert_eq!(MAP1_REP_NAMES[Map1Rep::Cvtdq2pd as usize], "cvtdq2pd");
        assert_eq!(MAP1_REPNE_NAMES[Map1Repne::Lddqu as usize], "lddqu");
        assert_eq!(MAP1_GROUP_NAMES[Map1Group::Extrq as usize], "extrq");
        assert_eq!(MAP2_NAMES[Map2::Movdir64b as usize], "movdir64b");
        assert_eq!(MAP3_NAMES[Map3::Hreset as usize], "hreset");
        assert_eq!(VEX_MAP1_NAMES[VexMap1::Vstmxcsr as usize], "vstmxcsr");
        assert_eq!(VEX_MAP2_NAMES[VexMap2::Shrx as usize], "shrx");
        assert_eq!(VEX_MAP3_NAMES[VexMap3::Rorx as usize], "rorx");
    }

    #[test]
    fn test_tables_fit_in_mnemonic_index() {
        for table in [
            NameTable::Map0,
            NameTable::Map1,
            NameTable::Map1Op,
            NameTable::Map1Rep,
            NameTable::Map1Repne,
            NameTable::Map1Group,
            NameTable::Map2,
            NameTable::Map3,
            NameTable::VexMap1,
            NameTable::VexMap2,
            NameTable::VexMap3,
        ] {
            assert!(table.names().len() <= 256, "{table:?}");
        }
        assert_eq!(NameTable::Map3.get(255), None);
    }
}
