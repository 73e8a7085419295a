//! Instruction Codec Unit Tests.
//!
//! Verifies field placement, masking, and sign extension for the three
//! instruction formats, and that decoding an encoded word recovers both
//! the fields and the original bits.

use risc32_core::isa::decode::decode;
use risc32_core::isa::instruction::{
    encode_ri, encode_rri, encode_rrr, sign_extend_17, InstructionBits,
};
use risc32_core::isa::opcodes;

// ══════════════════════════════════════════════════════════
// 1. Field placement
// ══════════════════════════════════════════════════════════

#[test]
fn rrr_field_placement() {
    let word = encode_rrr(opcodes::ADD, 3, 1, 2);
    assert_eq!(word, (1 << 27) | (3 << 22) | (1 << 17) | 2);
    assert_eq!(word.op(), opcodes::ADD);
    assert_eq!(word.ra(), 3);
    assert_eq!(word.rb(), 1);
    assert_eq!(word.rc(), 2);
}

#[test]
fn rri_field_placement() {
    let word = encode_rri(opcodes::ADDI, 1, 0, 5);
    assert_eq!(word, (2 << 27) | (1 << 22) | 5);
    assert_eq!(word.op(), opcodes::ADDI);
    assert_eq!(word.ra(), 1);
    assert_eq!(word.rb(), 0);
    assert_eq!(word.imm17(), 5);
}

#[test]
fn ri_field_placement() {
    let word = encode_ri(opcodes::LUI, 31, 0x3F_FFFF);
    assert_eq!(word.op(), opcodes::LUI);
    assert_eq!(word.ra(), 31);
    assert_eq!(word.imm22(), 0x3F_FFFF);
}

#[test]
fn encoders_mask_out_of_width_fields() {
    // A register index of 33 wraps into 5 bits; callers range-check.
    let word = encode_rrr(opcodes::ADD, 33, 0, 0);
    assert_eq!(word.ra(), 1);

    let word = encode_rri(opcodes::ADDI, 0, 0, 0xFFFF_FFFF);
    assert_eq!(word & 0x1_FFFF, 0x1_FFFF);
    assert_eq!(word.op(), opcodes::ADDI);
}

// ══════════════════════════════════════════════════════════
// 2. Sign extension
// ══════════════════════════════════════════════════════════

#[test]
fn imm17_sign_extension() {
    assert_eq!(sign_extend_17(0), 0);
    assert_eq!(sign_extend_17(65535), 65535);
    assert_eq!(sign_extend_17(0x1_FFFF), 0xFFFF_FFFF); // -1
    assert_eq!(sign_extend_17(0x1_0000), 0xFFFF_0000); // -65536
}

#[test]
fn imm17_extremes_through_a_word() {
    let most_negative = encode_rri(opcodes::ADDI, 1, 1, 0x1_0000);
    assert_eq!(decode(most_negative).imm17 as i32, -65536);

    let most_positive = encode_rri(opcodes::ADDI, 1, 1, 0x0_FFFF);
    assert_eq!(decode(most_positive).imm17 as i32, 65535);
}

#[test]
fn imm22_is_zero_extended() {
    let word = encode_ri(opcodes::LUI, 0, 0x20_0000);
    assert_eq!(decode(word).imm22, 0x20_0000);
    assert_eq!(decode(word).imm17 as i32, 0); // low 17 bits are zero
}

// ══════════════════════════════════════════════════════════
// 3. Round trips
// ══════════════════════════════════════════════════════════

#[test]
fn rrr_words_survive_decode_and_reencode() {
    for op in [opcodes::JALR, opcodes::ADD, opcodes::NAND] {
        for ra in [0u32, 1, 15, 31] {
            for rb in [0u32, 7, 31] {
                for rc in [0u32, 2, 31] {
                    let word = encode_rrr(op, ra, rb, rc);
                    let d = decode(word);
                    assert_eq!(
                        encode_rrr(d.op, d.ra as u32, d.rb as u32, d.rc as u32),
                        word
                    );
                }
            }
        }
    }
}

#[test]
fn rri_words_survive_decode_and_reencode() {
    for op in [opcodes::ADDI, opcodes::SW, opcodes::LW, opcodes::BEQ] {
        for imm in [0u32, 1, 512, 0x0_FFFF, 0x1_0000, 0x1_FFFF] {
            let word = encode_rri(op, 5, 9, imm);
            let d = decode(word);
            assert_eq!(encode_rri(d.op, d.ra as u32, d.rb as u32, d.imm17), word);
        }
    }
}

#[test]
fn ri_words_survive_decode_and_reencode() {
    for op in [opcodes::LUI, opcodes::WSR, opcodes::RSR, opcodes::IRET] {
        for imm in [0u32, 3, 1023, 0x3F_FFFF] {
            let word = encode_ri(op, 11, imm);
            let d = decode(word);
            assert_eq!(encode_ri(d.op, d.ra as u32, d.imm22), word);
        }
    }
}

#[test]
fn decode_keeps_the_raw_word() {
    let word = encode_rri(opcodes::BEQ, 1, 2, 0x1_FFFE);
    assert_eq!(decode(word).raw, word);
}
