use chip8::{assemble, Chip8Error};

#[test]
fn test_asm_maze() {
    let maze_asm = include_str!("maze.asm");

    #[rustfmt::skip]
    let expected: &[u8] = &[
        0x60, 0x00,             // LD   V0, 0
        0x61, 0x00,             // LD   V1, 0
        0xA2, 0x1E,             // LD   I, LEFT
        0xC2, 0x01,             // RND  V2, 1
        0x32, 0x01,             // SE   V2, 1
        0xA2, 0x22,             // LD   I, RIGHT
        0xD0, 0x14,             // DRW  V0, V1, 4
        0x70, 0x04,             // ADD  V0, 4
        0x30, 0x40,             // SE   V0, 64
        0x12, 0x04,             // JP   LOOP
        0x60, 0x00,             // LD   V0, 0
        0x71, 0x04,             // ADD  V1, 4
        0x31, 0x20,             // SE   V1, 32
        0x12, 0x04,             // JP   LOOP
        0x12, 0x1C,             // JP   DONE
        0x80, 0x40, 0x20, 0x10, // LEFT
        0x10, 0x20, 0x40, 0x80, // RIGHT
    ];

    match assemble(maze_asm.as_bytes(), false) {
        Ok(assembly) => assert_eq!(assembly.rom, expected),
        Err(err) => panic!("{err}"),
    }
}

#[test]
fn test_asm_label_forms() {
    // Dot labels and bare column-0 labels both bind.
    let assembly = assemble(b".first LD V0, #01\nsecond RET\n  JP SECOND\n", false).unwrap();

    assert_eq!(assembly.rom, &[0x60, 0x01, 0x00, 0xEE, 0x12, 0x02]);
    assert!(assembly.labels.contains_key("FIRST"));
    assert!(assembly.labels.contains_key("SECOND"));
}

#[test]
fn test_asm_duplicate_label() {
    let err = assemble(b"again RET\nagain RET\n", false).unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::DuplicateLabel { line: 2, ref name } if name == "AGAIN"
    ));
}

#[test]
fn test_asm_equ_var_declare() {
    let source = b"\
SPEED EQU 42
STAR VAR V5
  DECLARE WALL AS V3
  LD V0, SPEED
  LD STAR, #01
  LD WALL, #02
";

    let assembly = assemble(source, false).unwrap();
    assert_eq!(assembly.rom, &[0x60, 0x2A, 0x65, 0x01, 0x63, 0x02]);
}

#[test]
fn test_asm_equ_as_jump_target() {
    let assembly = assemble(b"TOP EQU #0208\n  JP TOP\n", false).unwrap();
    assert_eq!(assembly.rom, &[0x12, 0x08]);
}

#[test]
fn test_asm_forward_references() {
    // WORD records one patch per operand slot.
    let source = b"\
  JP MAIN
TABLE WORD FIRST, SECOND
FIRST LD V0, #01
SECOND RET
MAIN RET
";

    let assembly = assemble(source, false).unwrap();

    #[rustfmt::skip]
    let expected: &[u8] = &[
        0x12, 0x0A,             // JP   MAIN
        0x02, 0x06, 0x02, 0x08, // WORD FIRST, SECOND
        0x60, 0x01,             // LD   V0, #01
        0x00, 0xEE,             // RET
        0x00, 0xEE,             // RET
    ];
    assert_eq!(assembly.rom, expected);
}

#[test]
fn test_asm_unresolved_label() {
    let err = assemble(b"  JP NOWHERE\n", false).unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::UnresolvedLabel { ref name } if name == "NOWHERE"
    ));
}

#[test]
fn test_asm_byte_word_directives() {
    let assembly = assemble(b"  BYTE \"AB\", #01, -1\n  WORD #1234\n", false).unwrap();
    assert_eq!(assembly.rom, &[0x41, 0x42, 0x01, 0xFF, 0x12, 0x34]);
}

#[test]
fn test_asm_align_and_pad() {
    let assembly = assemble(b"  LD V0, #01\n  ALIGN 4\n  RET\n", false).unwrap();
    assert_eq!(assembly.rom, &[0x60, 0x01, 0x00, 0x00, 0x00, 0xEE]);

    // Aligned cursor pads nothing.
    let assembly = assemble(b"  ALIGN 4\n  RET\n", false).unwrap();
    assert_eq!(assembly.rom, &[0x00, 0xEE]);

    let assembly = assemble(b"  RESERVE 3\n  RET\n", false).unwrap();
    assert_eq!(assembly.rom, &[0x00, 0x00, 0x00, 0x00, 0xEE]);
}

#[test]
fn test_asm_break_and_assert() {
    let source = b"\
  LD V0, #01
  BREAK first stop
  LD V1, #02
  ASSERT ; flag must be set
  RET
";

    let assembly = assemble(source, false).unwrap();
    assert_eq!(assembly.rom.len(), 6);

    let breaks = &assembly.breakpoints;
    assert_eq!(breaks.len(), 2);

    assert_eq!(breaks[0].address, 0x202);
    assert_eq!(breaks[0].reason, "FIRST STOP");
    assert!(!breaks[0].conditional);

    assert_eq!(breaks[1].address, 0x204);
    assert_eq!(breaks[1].reason, "FLAG MUST BE SET");
    assert!(breaks[1].conditional);
}

#[test]
fn test_asm_super_mode() {
    let source = b"  SUPER\n  HIGH\n  SCU 4\n  SCD 2\n  SCR\n  SCL\n  EXIT\n  LOW\n";
    let assembly = assemble(source, false).unwrap();

    #[rustfmt::skip]
    let expected: &[u8] = &[
        0x00, 0xFF, // HIGH
        0x00, 0xB4, // SCU 4
        0x00, 0xC2, // SCD 2
        0x00, 0xFB, // SCR
        0x00, 0xFC, // SCL
        0x00, 0xFD, // EXIT
        0x00, 0xFE, // LOW
    ];
    assert_eq!(assembly.rom, expected);
    assert!(assembly.schip);

    // Guarded opcodes without the mode flag are illegal.
    assert!(matches!(
        assemble(b"  EXIT\n", false),
        Err(Chip8Error::IllegalInstruction { line: 1, .. })
    ));
    assert!(matches!(
        assemble(b"  SCU 4\n", false),
        Err(Chip8Error::IllegalInstruction { .. })
    ));
    assert!(matches!(
        assemble(b"  LD R, V2\n", false),
        Err(Chip8Error::IllegalInstruction { .. })
    ));

    // The mode switch must come before any emitted bytes.
    assert!(matches!(
        assemble(b"  CLS\n  SUPER\n", false),
        Err(Chip8Error::IllegalDirective { line: 2, .. })
    ));
}

#[test]
fn test_asm_extended_mode() {
    let source = b"  EXTENDED\n  SGT V1, V2\n  SLT V1, V2\n  MUL V3, V4\n  DIV V3, V4\n  BCD V5, V6\n  LD A, V7\n  ASCII \"AB\"\n";
    let assembly = assemble(source, false).unwrap();

    #[rustfmt::skip]
    let expected: &[u8] = &[
        0x51, 0x21, // SGT V1, V2
        0x51, 0x22, // SLT V1, V2
        0x93, 0x41, // MUL V3, V4
        0x93, 0x42, // DIV V3, V4
        0x95, 0x63, // BCD V5, V6
        0xF7, 0x94, // LD  A, V7
        0x01, 0x02, // ASCII "AB"
    ];
    assert_eq!(assembly.rom, expected);
    assert!(assembly.chip8e);

    assert!(matches!(
        assemble(b"  MUL V0, V1\n", false),
        Err(Chip8Error::IllegalInstruction { .. })
    ));
    assert!(matches!(
        assemble(b"  ASCII \"AB\"\n", false),
        Err(Chip8Error::IllegalDirective { .. })
    ));
}

#[test]
fn test_asm_byte_value_out_of_range() {
    // A byte operand over 255 matches no encoding shape.
    let err = assemble(b"   LD V0, 300\n", false).unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::IllegalInstruction { line: 1, ref mnemonic } if mnemonic == "LD"
    ));
}

#[test]
fn test_asm_syntax_errors() {
    // Malformed hex literal.
    assert!(matches!(
        assemble(b"  RET\n  LD V0, #ZZ\n", false),
        Err(Chip8Error::Syntax { line: 2, .. })
    ));

    // Unterminated string.
    assert!(matches!(
        assemble(b"  BYTE \"abc\n", false),
        Err(Chip8Error::Syntax { line: 1, .. })
    ));

    // Operand missing after a comma.
    assert!(matches!(
        assemble(b"  LD V0,\n", false),
        Err(Chip8Error::Syntax { line: 1, .. })
    ));

    // Mnemonic in the label column.
    assert!(matches!(
        assemble(b"CLS\n", false),
        Err(Chip8Error::Syntax { line: 1, .. })
    ));
}

#[test]
fn test_asm_eti_base() {
    let assembly = assemble(b"START LD V0, #01\n  JP START\n", true).unwrap();

    assert_eq!(assembly.base, 0x600);
    assert_eq!(assembly.rom, &[0x60, 0x01, 0x16, 0x00]);
}

#[test]
fn test_asm_ld_b_alias() {
    // BCD Vx and LD B, Vx are the same encoding.
    let bcd = assemble(b"  BCD V4\n", false).unwrap();
    let ld = assemble(b"  LD B, V4\n", false).unwrap();

    assert_eq!(bcd.rom, &[0xF4, 0x33]);
    assert_eq!(bcd.rom, ld.rom);
}

#[test]
fn test_asm_indirect_forms() {
    let assembly = assemble(b"  LD [I], V6\n  LD V6, [I]\n", false).unwrap();
    assert_eq!(assembly.rom, &[0xF6, 0x55, 0xF6, 0x65]);
}

#[test]
fn test_asm_shift_mirrors_x() {
    let assembly = assemble(b"  SHR V5\n  SHL VA\n", false).unwrap();
    assert_eq!(assembly.rom, &[0x85, 0x56, 0x8A, 0xAE]);
}
