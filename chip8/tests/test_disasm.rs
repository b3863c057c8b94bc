use chip8::{assemble, disassemble};

/// Every mnemonic form must survive an assemble/disassemble round trip
/// in its canonical spelling.
#[test]
fn test_disasm_round_trip() {
    let cases: &[(&str, &str)] = &[
        ("CLS", "CLS"),
        ("RET", "RET"),
        ("EXIT", "EXIT"),
        ("LOW", "LOW"),
        ("HIGH", "HIGH"),
        ("SCR", "SCR"),
        ("SCL", "SCL"),
        ("SCU 4", "SCU    4"),
        ("SCD 2", "SCD    2"),
        ("SYS #0123", "SYS    #0123"),
        ("JP #0234", "JP     #0234"),
        ("JP V0, #0234", "JP     V0, #0234"),
        ("CALL #0345", "CALL   #0345"),
        ("SE V1, #AB", "SE     V1, #AB"),
        ("SE V1, V2", "SE     V1, V2"),
        ("SNE V1, #AB", "SNE    V1, #AB"),
        ("SNE V1, V2", "SNE    V1, V2"),
        ("SGT V1, V2", "SGT    V1, V2"),
        ("SLT V1, V2", "SLT    V1, V2"),
        ("SKP V3", "SKP    V3"),
        ("SKNP V3", "SKNP   V3"),
        ("LD V4, #12", "LD     V4, #12"),
        ("LD V4, V5", "LD     V4, V5"),
        ("LD I, #0456", "LD     I, #0456"),
        ("LD V4, DT", "LD     V4, DT"),
        ("LD V4, K", "LD     V4, K"),
        ("LD DT, V4", "LD     DT, V4"),
        ("LD ST, V4", "LD     ST, V4"),
        ("LD F, V4", "LD     F, V4"),
        ("LD HF, V4", "LD     HF, V4"),
        ("LD B, V4", "LD     B, V4"),
        ("LD [I], V4", "LD     [I], V4"),
        ("LD V4, [I]", "LD     V4, [I]"),
        ("LD R, V4", "LD     R, V4"),
        ("LD V4, R", "LD     V4, R"),
        ("LD A, V4", "LD     A, V4"),
        ("OR V1, V2", "OR     V1, V2"),
        ("AND V1, V2", "AND    V1, V2"),
        ("XOR V1, V2", "XOR    V1, V2"),
        ("ADD V1, #02", "ADD    V1, #02"),
        ("ADD V1, V2", "ADD    V1, V2"),
        ("ADD I, V1", "ADD    I, V1"),
        ("SUB V1, V2", "SUB    V1, V2"),
        ("SUBN V1, V2", "SUBN   V1, V2"),
        ("SHR V1", "SHR    V1"),
        ("SHL V1", "SHL    V1"),
        ("MUL V1, V2", "MUL    V1, V2"),
        ("DIV V1, V2", "DIV    V1, V2"),
        ("BCD V1, V2", "BCD    V1, V2"),
        // BCD Vx shares its encoding with the load-shaped spelling.
        ("BCD V1", "LD     B, V1"),
        ("RND V1, #7F", "RND    V1, #7F"),
        ("DRW V1, V2, 5", "DRW    V1, V2, 5"),
        ("DRW V1, V2, 0", "DRW    V1, V2, 0"),
    ];

    for (line, expected) in cases {
        let source = format!("  SUPER\n  EXTENDED\n  {line}\n");
        let assembly = assemble(source.as_bytes(), false)
            .unwrap_or_else(|err| panic!("failed to assemble {line:?}: {err}"));

        assert_eq!(assembly.rom.len(), 2, "{line:?} must emit one instruction");

        let text = disassemble(&assembly.rom, 0);
        assert_eq!(text, format!("0000 - {expected}"), "for {line:?}");
    }
}

#[test]
fn test_disasm_zero_and_unknown() {
    assert_eq!(disassemble(&[0x00, 0x00], 0), "0000 -");
    assert_eq!(disassemble(&[0x8A, 0xB9], 0), "0000 - ??");
    assert_eq!(disassemble(&[0xEA, 0x00], 0), "0000 - ??");
    assert_eq!(disassemble(&[0xFA, 0xFF], 0), "0000 - ??");
    assert_eq!(disassemble(&[0x00], 0), "");
}

#[test]
fn test_disasm_against_vm_memory() {
    let assembly = assemble(b"  LD V0, #0A\n  DRW V0, V0, 1\n", false).unwrap();
    let vm = chip8::Chip8Vm::load_assembly(&assembly).unwrap();

    assert_eq!(vm.disassemble(0x200), "0200 - LD     V0, #0A");
    assert_eq!(vm.disassemble(0x202), "0202 - DRW    V0, V0, 1");
}
