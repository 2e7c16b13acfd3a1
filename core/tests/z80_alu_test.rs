use arnold_core::cpu::state::CpuStateTrait;
use arnold_core::cpu::z80::Z80;
mod common;
use common::{TestBus, run_instructions};

#[test]
fn add_sets_sign_and_undocumented_flags() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 0Ch; LD B, F3h; ADD A, B
    bus.load(0, &[0x3E, 0x0C, 0x06, 0xF3, 0x80]);

    run_instructions(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.snapshot().af(), 0xFFA8);
}

#[test]
fn adc_with_carry_in() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 08h; LD B, 07h; ADC A, B with CF set on entry
    bus.load(0, &[0x3E, 0x08, 0x06, 0x07, 0x88]);

    run_instructions(&mut cpu, &mut bus, 2);
    cpu.f |= 0x01; // carry in
    run_instructions(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.snapshot().af(), 0x1010);
}

#[test]
fn sub_sets_borrow() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 10h; SUB 20h
    bus.load(0, &[0x3E, 0x10, 0xD6, 0x20]);

    run_instructions(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0xF0);
    assert_ne!(cpu.f & 0x01, 0); // C (borrow)
    assert_ne!(cpu.f & 0x02, 0); // N
    assert_ne!(cpu.f & 0x80, 0); // S
}

#[test]
fn and_sets_half_carry_and_parity() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 0Fh; AND 03h
    bus.load(0, &[0x3E, 0x0F, 0xE6, 0x03]);

    run_instructions(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x03);
    assert_ne!(cpu.f & 0x10, 0); // H always set for AND
    assert_ne!(cpu.f & 0x04, 0); // even parity
    assert_eq!(cpu.f & 0x01, 0); // C cleared
}

#[test]
fn xor_a_clears_accumulator() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0xAF]); // XOR A

    run_instructions(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0);
    assert_ne!(cpu.f & 0x40, 0); // Z
    assert_ne!(cpu.f & 0x04, 0); // parity of zero is even
}

#[test]
fn cp_leaves_accumulator() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 42h; CP 42h
    bus.load(0, &[0x3E, 0x42, 0xFE, 0x42]);

    run_instructions(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x42);
    assert_ne!(cpu.f & 0x40, 0); // Z: equal
}

#[test]
fn inc_dec_preserve_carry() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // SCF; INC B; DEC B
    bus.load(0, &[0x37, 0x04, 0x05]);
    cpu.b = 0x0F;

    run_instructions(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.b, 0x10);
    assert_ne!(cpu.f & 0x10, 0); // H: carry out of bit 3
    assert_ne!(cpu.f & 0x01, 0); // C survives INC
    run_instructions(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.b, 0x0F);
    assert_ne!(cpu.f & 0x01, 0); // and DEC
}

#[test]
fn overflow_flag_on_signed_boundary() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 7Fh; INC A
    bus.load(0, &[0x3E, 0x7F, 0x3C]);

    run_instructions(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x80);
    assert_ne!(cpu.f & 0x04, 0); // P/V overflow
    assert_ne!(cpu.f & 0x80, 0); // S
}

#[test]
fn add_hl_rr_affects_h_and_c_only() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD HL, 0FFFh; LD BC, 0001h; ADD HL, BC
    bus.load(0, &[0x21, 0xFF, 0x0F, 0x01, 0x01, 0x00, 0x09]);
    cpu.f = 0xC4; // S, Z, PV set: must survive

    run_instructions(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.get_hl(), 0x1000);
    assert_ne!(cpu.f & 0x10, 0); // H from bit 11
    assert_eq!(cpu.f & 0x01, 0); // no carry
    assert_ne!(cpu.f & 0x80, 0); // S preserved
    assert_ne!(cpu.f & 0x40, 0); // Z preserved
}

#[test]
fn sbc_hl_detects_zero() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD HL, 1234h; LD DE, 1234h; SBC HL, DE (carry clear)
    bus.load(0, &[0x21, 0x34, 0x12, 0x11, 0x34, 0x12, 0xED, 0x52]);
    cpu.f = 0;

    run_instructions(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.get_hl(), 0);
    assert_ne!(cpu.f & 0x40, 0); // Z on the 16-bit result
}

#[test]
fn daa_corrects_bcd_addition() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 15h; ADD A, 27h; DAA → 42 BCD
    bus.load(0, &[0x3E, 0x15, 0xC6, 0x27, 0x27]);

    run_instructions(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x42);
}

#[test]
fn neg_negates() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    // LD A, 01h; NEG
    bus.load(0, &[0x3E, 0x01, 0xED, 0x44]);

    run_instructions(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0xFF);
    assert_ne!(cpu.f & 0x01, 0); // borrow
    assert_ne!(cpu.f & 0x02, 0); // N
}

#[test]
fn rotate_accumulator_preserves_szp() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x07]); // RLCA
    cpu.a = 0x81;
    cpu.f = 0xC4; // S, Z, PV

    run_instructions(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x03);
    assert_ne!(cpu.f & 0x01, 0); // carry out of bit 7
    assert_eq!(cpu.f & 0xC4, 0xC4); // S, Z, PV untouched
}

#[test]
fn cb_shift_flags() {
    let mut cpu = Z80::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0xCB, 0x27]); // SLA A
    cpu.a = 0xC0;

    run_instructions(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x80);
    assert_ne!(cpu.f & 0x01, 0); // carry out
    assert_ne!(cpu.f & 0x80, 0); // S
}
