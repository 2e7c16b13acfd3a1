use arnold_core::core::machine::Machine;
use arnold_core::core::{Bus, BusMaster};
use arnold_machines::cpc::{Cpc, Model, RomVariant};
use arnold_machines::keyboard::KEY_A;
use arnold_machines::rom_loader::RomSet;

const CPU: BusMaster = BusMaster::Cpu(0);

fn boot(model: Model) -> Cpc {
    let firmware = vec![0u8; 0x8000];
    let name = match model {
        Model::Cpc464 => "cpc464.rom",
        Model::Cpc664 => "cpc664.rom",
        Model::Cpc6128 => "cpc6128.rom",
    };
    let set = RomSet::from_slices(&[(name, &firmware)]);
    let mut cpc = Cpc::new(model);
    cpc.load_rom_set(&set, RomVariant::English).unwrap();
    cpc
}

/// Program the standard CPC register set into the CRTC through the I/O
/// fabric: R0=63, R1=40, R2=46, R3=0x8E, R4=38, R6=25, R7=30, R9=7.
fn program_crtc(cpc: &mut Cpc) {
    let values: [(u8, u8); 9] = [
        (0, 63),
        (1, 40),
        (2, 46),
        (3, 0x8E),
        (4, 38),
        (5, 0),
        (6, 25),
        (7, 30),
        (9, 7),
    ];
    for (reg, val) in values {
        cpc.board.io_write(CPU, 0xBC00, reg);
        cpc.board.io_write(CPU, 0xBD00, val);
    }
}

// ---------------------------------------------------------------------------
// Memory map and paging
// ---------------------------------------------------------------------------

#[test]
fn ram_select_keeps_written_bytes_reachable() {
    let mut cpc = boot(Model::Cpc6128);
    // For every configuration, a write through 0xC000 must read back.
    for low in 0..8u8 {
        cpc.board.io_write(CPU, 0x7F00, 0xC0 | low);
        cpc.board.write(CPU, 0xC000, 0x20 | low);
        // Reads at 0xC000 go to the upper ROM while it is enabled.
        cpc.board.io_write(CPU, 0x7F00, 0x80 | 0x08 | 0x04);
        assert_eq!(cpc.board.read(CPU, 0xC000), 0x20 | low, "config {}", low);
        cpc.board.io_write(CPU, 0x7F00, 0x80); // ROMs back on
    }
}

#[test]
fn bank_switching_keeps_separate_contents() {
    let mut cpc = boot(Model::Cpc6128);

    // selectRam(0xC4): page 1 maps RAM bank 4.
    cpc.board.io_write(CPU, 0x7F00, 0xC4);
    cpc.board.write(CPU, 0x4000, 0xAA);
    assert_eq!(cpc.board.read(CPU, 0x4000), 0xAA);

    // selectRam(0xC0): page 1 maps RAM bank 1 again.
    cpc.board.io_write(CPU, 0x7F00, 0xC0);
    cpc.board.write(CPU, 0x4000, 0xBB);
    assert_eq!(cpc.board.read(CPU, 0x4000), 0xBB);

    // Back to bank 4: the first byte is still there.
    cpc.board.io_write(CPU, 0x7F00, 0xC4);
    assert_eq!(cpc.board.read(CPU, 0x4000), 0xAA);
}

#[test]
fn ram_select_is_ignored_on_64k_machines() {
    let mut cpc = boot(Model::Cpc464);
    cpc.board.io_write(CPU, 0x7F00, 0xC2); // bank 1 everywhere on a 6128
    cpc.board.write(CPU, 0x0000, 0x11);
    // Disable the lower ROM so the RAM underneath is readable.
    cpc.board.io_write(CPU, 0x7F00, 0x80 | 0x04);
    assert_eq!(cpc.board.read(CPU, 0x0000), 0x11);
}

#[test]
fn rom_overlay_beats_ram_reads_only() {
    let mut cpc = boot(Model::Cpc6128);
    // Writes land in RAM even while the ROM overlays the reads.
    cpc.board.write(CPU, 0x0010, 0x42);
    assert_eq!(cpc.board.read(CPU, 0x0010), 0x00); // zeroed firmware
    cpc.board.io_write(CPU, 0x7F00, 0x80 | 0x04); // lower ROM off
    assert_eq!(cpc.board.read(CPU, 0x0010), 0x42);
}

#[test]
fn missing_expansion_slot_falls_back_to_builtin_upper_rom() {
    let firmware: Vec<u8> = (0..0x8000u32).map(|i| (i >> 8) as u8).collect();
    let set = RomSet::from_slices(&[("cpc6128.rom", &firmware)]);
    let mut cpc = Cpc::new(Model::Cpc6128);
    cpc.load_rom_set(&set, RomVariant::English).unwrap();
    // No amsdos.rom in the set: slot 7 is not ready.

    cpc.board.io_write(CPU, 0xDF00, 7);
    assert_eq!(cpc.board.rom_bank, 0);
    // 0xC000 reads the on-board upper ROM at offset 0x4000.
    assert_eq!(cpc.board.read(CPU, 0xC000), firmware[0x4000]);
}

#[test]
fn ready_expansion_slot_is_selected() {
    let mut cpc = boot(Model::Cpc6128);
    let image = vec![0x5Au8; 0x4000];
    cpc.insert_expansion_rom(3, &image).unwrap();

    cpc.board.io_write(CPU, 0xDF00, 3);
    assert_eq!(cpc.board.rom_bank, 3);
    assert_eq!(cpc.board.read(CPU, 0xC000), 0x5A);

    // Selecting slot 0 always means the built-in image.
    cpc.board.io_write(CPU, 0xDF00, 0);
    assert_eq!(cpc.board.read(CPU, 0xC000), 0x00);
}

// ---------------------------------------------------------------------------
// CRTC access through the I/O fabric
// ---------------------------------------------------------------------------

#[test]
fn crtc_register_roundtrip_through_ports() {
    let mut cpc = boot(Model::Cpc6128);
    // R12/R13 are read/write on the type 0 CRTC.
    cpc.board.io_write(CPU, 0xBC00, 12);
    cpc.board.io_write(CPU, 0xBD00, 0xFF);
    assert_eq!(cpc.board.io_read(CPU, 0xBF00), 0x3F); // write mask applied

    cpc.board.io_write(CPU, 0xBC00, 13);
    cpc.board.io_write(CPU, 0xBD00, 0x21);
    assert_eq!(cpc.board.io_read(CPU, 0xBF00), 0x21);
}

#[test]
fn crtc_status_port_by_type() {
    let mut cpc = boot(Model::Cpc6128);
    assert_eq!(cpc.board.io_read(CPU, 0xBE00) & 0x20, 0); // type 0: no status

    cpc.set_crtc_type(1);
    program_crtc(&mut cpc);
    cpc.run(true);
    // Somewhere in the frame the vertical blanking bit must have been
    // readable; immediately after the frame flips it is well-defined.
    let status = cpc.board.io_read(CPU, 0xBE00);
    assert_eq!(status & !0x20, 0); // only bit 5 implemented
}

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

#[test]
fn gate_array_interrupt_every_52_hsyncs() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);

    let mut ticks: u64 = 0;
    // Let the raster settle for a frame.
    cpc.run(true);

    // Find the first INT assertion.
    cpc.board.ga.acknowledge_interrupt();
    while !cpc.board.ga.irq() {
        cpc.clock();
        ticks += 1;
        assert!(ticks < 2_000_000);
    }
    let first = ticks;
    cpc.board.ga.acknowledge_interrupt();
    while !cpc.board.ga.irq() {
        cpc.clock();
        ticks += 1;
        assert!(ticks < 4_000_000);
    }

    // 52 HSYNCs at 64 µs each, 16 master ticks per µs.
    assert_eq!(ticks - first, 52 * 64 * 16);
}

#[test]
fn interrupt_spacing_is_300_hz() {
    // 52 lines * 64 µs = 3.328 ms per INT: 300.48 Hz, within 300 ± 1.
    let period_us: f64 = 52.0 * 64.0;
    let frequency = 1_000_000.0 / period_us;
    assert!((frequency - 300.0).abs() < 1.0);
}

#[test]
fn gate_array_port_write_delays_interrupt() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);
    cpc.run(true);

    // Run until close to an interrupt, then push it away.
    while cpc.board.ga.int_counter < 40 {
        cpc.clock();
    }
    cpc.board.io_write(CPU, 0x7F00, 0x80 | 0x10);
    assert_eq!(cpc.board.ga.int_counter, 0);
    assert!(!cpc.board.ga.irq());
}

// ---------------------------------------------------------------------------
// Video output
// ---------------------------------------------------------------------------

const COLOURS: [u32; 32] = arnold_core::device::gate_array::COLOURS;

#[test]
fn blank_palette_paints_only_colour_zero() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);

    // All pens and the border to hardware colour 0.
    for pen in 0..16u8 {
        cpc.board.io_write(CPU, 0x7F00, pen);
        cpc.board.io_write(CPU, 0x7F00, 0x40);
    }
    cpc.board.io_write(CPU, 0x7F00, 0x10);
    cpc.board.io_write(CPU, 0x7F00, 0x40);

    cpc.run(true);
    cpc.run(true);

    let mut painted = 0usize;
    for &pixel in cpc.board.ga.pixels_x1() {
        if pixel != 0 {
            assert_eq!(pixel, COLOURS[0]);
            painted += 1;
        }
    }
    assert!(painted > 100_000, "painted {painted} pixels");
}

#[test]
fn mode2_ink_and_border_split() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);

    // Pen 0 = colour 1, border = colour 20, mode 2.
    cpc.board.io_write(CPU, 0x7F00, 0x00);
    cpc.board.io_write(CPU, 0x7F00, 0x40 | 0x01);
    cpc.board.io_write(CPU, 0x7F00, 0x10);
    cpc.board.io_write(CPU, 0x7F00, 0x40 | 0x14);
    cpc.board.io_write(CPU, 0x7F00, 0x80 | 0x02);

    // Screen memory (base address 0) is already zero filled: every
    // displayed byte expands to pen 0 in mode 2.
    cpc.run(true);
    cpc.run(true);

    let mut ink = 0usize;
    let mut border = 0usize;
    for &pixel in cpc.board.ga.pixels_x1() {
        if pixel == COLOURS[1] {
            ink += 1;
        } else if pixel == COLOURS[20] {
            border += 1;
        } else {
            assert_eq!(pixel, 0, "unexpected colour {pixel:#010X}");
        }
    }
    // 640 ink pixels per displayed line, 200 displayed lines.
    assert!(ink >= 640 * 190, "ink {ink}");
    assert!(border > 50_000, "border {border}");
}

#[test]
fn scan_mode_selects_framebuffer_height() {
    let mut cpc = boot(Model::Cpc6128);
    assert_eq!(cpc.display_size(), (1024, 312));
    cpc.set_scan_mode(arnold_core::device::gate_array::ScanMode::Scanlines);
    assert_eq!(cpc.display_size(), (1024, 624));
}

// ---------------------------------------------------------------------------
// PPI, keyboard and PSG glue
// ---------------------------------------------------------------------------

#[test]
fn port_b_composition() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);

    let value = cpc.board.io_read(CPU, 0xF500);
    // Brand 7 in bits 3..1, the 50 Hz/printer bits, no tape level.
    assert_eq!(value & 0x0E, 7 << 1);
    assert_eq!(value & 0x50, 0x50);
    assert_eq!(value & 0x80, 0);
}

#[test]
fn port_b_reports_forced_vsync() {
    let mut cpc = boot(Model::Cpc6128);
    // Drive port B as output with bit 0 set: VSYNC looks asserted.
    cpc.board.io_write(CPU, 0xF700, 0x80); // everything output
    cpc.board.io_write(CPU, 0xF500, 0x01);
    assert!(cpc.board.ga.crtc.v_sync_forced);
}

#[test]
fn keyboard_matrix_reads_through_psg_port_a() {
    let mut cpc = boot(Model::Cpc6128);
    cpc.set_input(KEY_A, true); // row 8, column 5

    // Latch PSG register 14 (port A) with port A as output.
    cpc.board.io_write(CPU, 0xF700, 0x82);
    cpc.board.io_write(CPU, 0xF400, 14);
    cpc.board.io_write(CPU, 0xF600, 0xC0);
    cpc.board.io_write(CPU, 0xF600, 0x00);

    // Port A back to input, select row 8 and the PSG read command.
    cpc.board.io_write(CPU, 0xF700, 0x92);
    cpc.board.io_write(CPU, 0xF600, 0x48);

    let column = cpc.board.io_read(CPU, 0xF400);
    assert_eq!(column, 0xFF & !(1 << 5));

    // Released again: all bits high.
    cpc.set_input(KEY_A, false);
    cpc.board.io_write(CPU, 0xF600, 0x48);
    assert_eq!(cpc.board.io_read(CPU, 0xF400), 0xFF);
}

#[test]
fn tape_motor_relay_follows_port_c() {
    let mut cpc = boot(Model::Cpc6128);
    cpc.board.io_write(CPU, 0xF700, 0x82);
    cpc.board.io_write(CPU, 0xF600, 0x10); // motor on

    assert!(cpc.board.relay());

    // The ramp counter climbs while the relay holds.
    cpc.run(false);
    assert!(cpc.board.tape_speed() > 0);

    cpc.board.io_write(CPU, 0xF600, 0x00); // motor off
    let peak = cpc.board.tape_speed();
    cpc.run(false);
    assert!(cpc.board.tape_speed() < peak);
}

// ---------------------------------------------------------------------------
// CPU programs on the machine
// ---------------------------------------------------------------------------

fn run_until_halt(cpc: &mut Cpc) {
    let mut guard = 0u64;
    while !cpc.cpu().halted {
        cpc.clock();
        guard += 1;
        assert!(guard < 10_000_000, "program never halted");
    }
}

#[test]
fn add_program_produces_documented_af() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);

    // LD A, 0Ch; LD B, F3h; ADD A, B; HALT — in RAM above the ROM overlay.
    for (i, byte) in [0x3E, 0x0C, 0x06, 0xF3, 0x80, 0x76].iter().enumerate() {
        cpc.board.write(CPU, 0x4000 + i as u16, *byte);
    }
    cpc.cpu_mut().pc = 0x4000;

    run_until_halt(&mut cpc);
    use arnold_core::cpu::state::CpuStateTrait;
    assert_eq!(cpc.cpu().snapshot().af(), 0xFFA8);
}

#[test]
fn adc_program_produces_documented_af() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);

    // LD A, 08h; LD B, 07h; SCF; ADC A, B; HALT
    for (i, byte) in [0x3E, 0x08, 0x06, 0x07, 0x37, 0x88, 0x76].iter().enumerate() {
        cpc.board.write(CPU, 0x4000 + i as u16, *byte);
    }
    cpc.cpu_mut().pc = 0x4000;

    run_until_halt(&mut cpc);
    use arnold_core::cpu::state::CpuStateTrait;
    assert_eq!(cpc.cpu().snapshot().af(), 0x1010);
}

#[test]
fn audio_queue_fills_during_a_frame() {
    let mut cpc = boot(Model::Cpc6128);
    program_crtc(&mut cpc);
    cpc.run(true);

    let mut buffer = [0i16; 4096];
    let written = cpc.fill_audio(&mut buffer);
    // One 50 Hz frame yields roughly 882 stereo sample pairs.
    assert!(written >= 1600, "only {written} samples");
    assert_eq!(written % 2, 0);
}
