use std::collections::{HashMap, VecDeque};

use arnold_core::core::bus::InterruptState;
use arnold_core::core::machine::{InputKey, Machine};
use arnold_core::core::{Bus, BusMaster};
use arnold_core::cpu::Cpu;
use arnold_core::cpu::z80::Z80;
use arnold_core::device::gate_array::{GateArray, ScanMode, X_SIZE, Y_SIZE};
use arnold_core::device::{Ay8910, Crtc6845, Fdc765, Ppi8255, TapeDeck};

use crate::keyboard::CPC_INPUT_MAP;
use crate::rom_loader::{RomLoadError, RomSet};

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
// Master clock:   16 MHz
// CPU clock:      16 / 4 = 4 MHz
// CCLK:           16 / 16 = 1 MHz (CRTC character clock)
// Scan line:      64 CCLKs = 64 µs
// Frame:          312 lines = 19968 µs ≈ 50.08 Hz

const BASE_CLOCK: u32 = 16_000_000;
const SAMPLE_RATE: u32 = 44_100;
/// One PAL frame in microseconds (sixteen master ticks each).
pub const FRAME_TIME: u32 = 19_968;
const FRAME_TIME_50HZ: u32 = 20_000;

/// Sliding window for the tape buzz filter, written once per CPU half-phase.
const FILTER_BZZ_SIZE: usize = 256;
const LOAD_VOLUME: i32 = 0x01FF;
const SAVE_VOLUME: i32 = 0x0FFF;

/// Cassette motor ramp: the relay spins the mechanism up and down through
/// this counter, and playback is only audible above half speed.
const MOTOR_RAMP_MAX: u32 = 686_000;
const MOTOR_PLAY_THRESHOLD: u32 = 343_000;

/// Queued audio bound: about a quarter second of stereo samples.
const AUDIO_QUEUE_MAX: usize = 22_050;

const RAM_SIZE: usize = 0x20000; // eight 16 KiB banks
const BANK_SIZE: usize = 0x4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    Cpc464,
    Cpc664,
    Cpc6128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RomVariant {
    English,
    Spanish,
    French,
}

/// Firmware image filename for a model/locale pair. The 664 was only ever
/// sold with the English firmware.
pub fn firmware_rom_name(model: Model, variant: RomVariant) -> &'static str {
    match (model, variant) {
        (Model::Cpc464, RomVariant::English) => "cpc464.rom",
        (Model::Cpc464, RomVariant::Spanish) => "cpc464-spanish.rom",
        (Model::Cpc464, RomVariant::French) => "cpc464-french.rom",
        (Model::Cpc664, _) => "cpc664.rom",
        (Model::Cpc6128, RomVariant::English) => "cpc6128.rom",
        (Model::Cpc6128, RomVariant::Spanish) => "cpc6128-spanish.rom",
        (Model::Cpc6128, RomVariant::French) => "cpc6128-french.rom",
    }
}

pub const AMSDOS_ROM_NAME: &str = "amsdos.rom";
/// Expansion slot conventionally holding AMSDOS.
pub const AMSDOS_SLOT: u8 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StereoMode {
    Mono,
    Abc,
    Acb,
}

/// Currently selected upper ROM image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UpperRom {
    Builtin,
    Slot(u8),
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Everything on the CPC mainboard except the CPU. Split out so the CPU can
/// drive it through the `Bus` trait without aliasing itself.
pub struct Board {
    pub ga: GateArray,
    pub ppi: Ppi8255,
    pub psg: Ay8910,
    pub fdc: Fdc765,
    pub tape: TapeDeck,

    ram: Vec<u8>,
    /// Lower 16 KiB firmware plus default upper ROM.
    rom: Vec<u8>,
    /// Expansion ROM images by slot number.
    ext: HashMap<u8, Vec<u8>>,
    ext_ready: [bool; 256],

    /// RAM bank index backing each CPU address quadrant.
    page: [usize; 4],
    pub rom_bank: u8,
    upper: UpperRom,

    /// Keyboard matrix rows, active-low.
    pub keys: [u8; 10],

    pub tape_level: u8,
    relay: bool,
    tape_speed: u32,

    brand: u8,
    exp_bit: bool,
    cpc128k: bool,
    cpc_disk: bool,

    pub tape_sound: bool,
    filter: [i32; FILTER_BZZ_SIZE],
    filter_index: usize,
}

impl Board {
    fn new(model: Model) -> Self {
        Self {
            ga: GateArray::new(0),
            ppi: Ppi8255::new(),
            psg: Ay8910::new(),
            fdc: Fdc765::new(),
            tape: TapeDeck::new(),
            ram: vec![0; RAM_SIZE],
            rom: vec![0; 2 * BANK_SIZE],
            ext: HashMap::new(),
            ext_ready: [false; 256],
            page: [0, 1, 2, 3],
            rom_bank: 0,
            upper: UpperRom::Builtin,
            keys: [0xFF; 10],
            tape_level: 0,
            relay: false,
            tape_speed: 0,
            brand: 7, // Amstrad
            exp_bit: false,
            cpc128k: model == Model::Cpc6128,
            cpc_disk: model != Model::Cpc464,
            tape_sound: true,
            filter: [0; FILTER_BZZ_SIZE],
            filter_index: 0,
        }
    }

    fn set_page(&mut self, page: usize, bank: usize) {
        self.page[page] = bank;
    }

    /// RAM configuration select (Gate Array function 11xxxxxx, 128K only).
    pub fn select_ram(&mut self, byte: u8) {
        match byte & 0x07 {
            0 => {
                // Bank 0, first screen buffer
                self.page = [0, 1, 2, 3];
            }
            1 => {
                // Bank 0, second screen buffer
                self.page = [0, 1, 2, 7];
            }
            2 => {
                // Bank 1
                self.page = [4, 5, 6, 7];
            }
            3 => {
                // Screen 1 at 0x4000, screen 2 at 0xC000
                self.page = [0, 3, 2, 7];
            }
            n => {
                // Bank 1 page n at 0x4000
                self.page = [0, n as usize, 2, 3];
            }
        }
    }

    /// Upper ROM bank select (&DFxx). A slot with no ready image falls back
    /// to the on-board upper ROM.
    fn select_rom_bank(&mut self, byte: u8) {
        self.rom_bank = byte;
        if byte != 0 && self.ext_ready[byte as usize] {
            self.upper = UpperRom::Slot(byte);
        } else {
            self.rom_bank = 0;
            self.upper = UpperRom::Builtin;
        }
    }

    fn upper_rom_byte(&self, offset: usize) -> u8 {
        match self.upper {
            UpperRom::Builtin => self.rom[BANK_SIZE + offset],
            UpperRom::Slot(slot) => self.ext[&slot][offset],
        }
    }

    fn ram_byte(&self, area: usize, offset: usize) -> u8 {
        self.ram[self.page[area] * BANK_SIZE + offset]
    }

    /// Re-evaluate the PPI-driven board wiring after any PPI access:
    /// keyboard row selection through port C low, and the PSG bus command
    /// on port C high.
    fn ppi_side_effects(&mut self) {
        if !self.ppi.dir_lo_c {
            let row = (self.ppi.port_c & 0x0F) as usize;
            let column = self.keys.get(row).copied().unwrap_or(0xFF);
            self.psg.set_port_a(column);
        }

        if !self.ppi.dir_hi_c {
            self.relay = self.ppi.port_c & 0x10 != 0;

            match self.ppi.port_c & 0xC0 {
                0x40 => {
                    // The PSG data bus is wired to the port A pins.
                    let value = self.psg.read();
                    self.ppi.input_a = value;
                    self.ppi.port_a = value;
                }
                0x80 => self.psg.write(self.ppi.port_a),
                0xC0 => self.psg.addr(self.ppi.port_a),
                _ => {}
            }
        }
    }

    /// Cassette mechanics, run at every CPU half-phase: motor ramp, pulse
    /// consumption and the buzz filter feeding the mixer.
    fn tape_clock(&mut self) {
        if self.relay {
            if self.tape_speed < MOTOR_RAMP_MAX {
                self.tape_speed += 1;
            }
        } else if self.tape_speed > 0 {
            self.tape_speed -= 1;
        }

        if self.tape.playing && self.tape_speed > 0 {
            self.tape.sample -= 1;
            if self.tape.sample < 0 {
                let level = self.tape.advance();
                self.tape_level = if self.tape_speed >= MOTOR_PLAY_THRESHOLD {
                    (level & 0x40) << 1
                } else {
                    0
                };
            }
        } else if self.ppi.port_c & 0x20 != 0 {
            // Recording: the save line loops back into the EAR input
            // through its coupling capacitor.
            self.tape_level = if self.tape.ear_feedback(true) { 0x80 } else { 0 };
        } else if !self.tape.ear_feedback(false) {
            self.tape_level = 0;
        }

        let mut level = 0;
        if self.tape_level != 0 && self.tape_sound {
            level += LOAD_VOLUME;
        }
        if self.ppi.port_c & 0x20 != 0 {
            level += SAVE_VOLUME;
        }
        self.filter[self.filter_index] = level;
        self.filter_index = (self.filter_index + 1) % FILTER_BZZ_SIZE;
    }

    fn buzz_level(&self) -> i32 {
        self.filter.iter().sum::<i32>() / FILTER_BZZ_SIZE as i32
    }

    /// Cassette motor ramp position.
    pub fn tape_speed(&self) -> u32 {
        self.tape_speed
    }

    pub fn relay(&self) -> bool {
        self.relay
    }
}

impl Bus for Board {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let area = (addr >> 14) as usize;
        let offset = (addr & 0x3FFF) as usize;
        match area {
            0 if self.ga.lower_rom => self.rom[offset],
            3 if self.ga.upper_rom => self.upper_rom_byte(offset),
            _ => self.ram_byte(area, offset),
        }
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        // Writes always land in RAM, never in ROM.
        let area = (addr >> 14) as usize;
        let offset = (addr & 0x3FFF) as usize;
        self.ram[self.page[area] * BANK_SIZE + offset] = data;
    }

    fn io_read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let mut byte = 0xFF; // open bus

        // CRTC: &BExx status, &BFxx register read.
        if addr & 0x4000 == 0 {
            match (addr >> 8) & 0x03 {
                2 => self.ga.crtc.rd_status(&mut byte),
                3 => self.ga.crtc.rd_register(&mut byte),
                _ => {}
            }
        }

        // 8255 PPI: &F4xx-&F7xx.
        if addr & 0x0800 == 0 {
            match (addr >> 8) & 0x03 {
                0 => byte = self.ppi.read_port_a(),
                1 => {
                    let vsync = self.ga.crtc.v_sync || self.ga.crtc.v_sync_forced;
                    self.ppi.input_b = self.tape_level
                        | 0x50
                        | (self.brand << 1)
                        | if self.exp_bit { 0x20 } else { 0x00 }
                        | if vsync { 0x01 } else { 0x00 };
                    byte = self.ppi.read_port_b();
                }
                2 => {
                    self.ppi.input_c = 0x2F;
                    byte = self.ppi.read_port_c();
                }
                _ => {}
            }
            self.ppi_side_effects();
        }

        // FDC: &FB7E main status, &FB7F data.
        if self.cpc_disk && addr & 0x0400 == 0 && addr & 0x0080 == 0 {
            match addr & 0x0101 {
                0x0100 => byte = self.fdc.status(),
                0x0101 => byte = self.fdc.read(),
                _ => {}
            }
        }

        byte
    }

    fn io_write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        // PAL and Gate Array share the A15=0 select; data bits 7..6 route
        // between RAM management and the Gate Array functions.
        if addr & 0x8000 == 0 {
            if data & 0xC0 == 0xC0 {
                if self.cpc128k {
                    self.select_ram(data);
                }
            } else if addr & 0x4000 != 0 {
                self.ga.write(data);
            }
        }

        // ROM bank select: &DFxx.
        if addr & 0x2000 == 0 {
            self.select_rom_bank(data);
        }

        // CRTC: &BCxx register select, &BDxx register write.
        if addr & 0x4000 == 0 {
            match (addr >> 8) & 0x03 {
                0 => self.ga.crtc.wr_address(data),
                1 => self.ga.crtc.wr_register(data),
                _ => {}
            }
        }

        // 8255 PPI: &F4xx-&F7xx.
        if addr & 0x0800 == 0 {
            match (addr >> 8) & 0x03 {
                0 => self.ppi.write_port_a(data),
                1 => {
                    self.ppi.write_port_b(data);
                    self.ga.crtc.v_sync_forced = self.ppi.port_b & 0x01 != 0;
                }
                2 => self.ppi.write_port_c(data),
                _ => self.ppi.write_control(data),
            }
            self.ppi_side_effects();
        }

        // FDC: &FB7F data, &FA7E motor.
        if self.cpc_disk && addr & 0x0400 == 0 && addr & 0x0080 == 0 {
            match addr & 0x0101 {
                0x0101 => self.fdc.write(data),
                0x0000 | 0x0001 => self.fdc.set_motor(data & 0x01 == 0x01),
                _ => {}
            }
        }
    }

    fn interrupt_ack(&mut self, _master: BusMaster) -> u8 {
        self.ga.acknowledge_interrupt();
        0xFF // nothing drives the data bus during the acknowledge
    }

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        false
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState {
            nmi: false,
            irq: self.ga.irq(),
        }
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Amstrad CPC 464/664/6128.
///
/// Hardware: Zilog Z80A @ 4 MHz, 6845 CRTC, Amstrad Gate Array,
/// 8255 PPI, AY-3-8910 PSG, uPD765 FDC (664/6128).
/// Video: Gate Array pixel pipeline into a 1024-wide RGBA framebuffer.
pub struct Cpc {
    cpu: Z80,
    pub board: Board,

    model: Model,
    stereo: StereoMode,

    /// Master ticks consumed by the last `run` call.
    pub cycles: u32,

    // Audio resampling: sample every `skip` master ticks, with the
    // fractional part compensated in parts-per-million.
    skip: u32,
    tail: u32,
    skip_cycles: u32,
    remaining: u32,
    audio: VecDeque<i16>,
}

impl Cpc {
    pub fn new(model: Model) -> Self {
        let mut cpc = Self {
            cpu: Z80::new(),
            board: Board::new(model),
            model,
            stereo: StereoMode::Mono,
            cycles: 0,
            skip: 0,
            tail: 0,
            skip_cycles: 0,
            remaining: 0,
            audio: VecDeque::with_capacity(AUDIO_QUEUE_MAX),
        };
        cpc.set_sound_rate(FRAME_TIME, false);
        cpc.skip_cycles = cpc.skip;
        cpc
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// Load the firmware image (and AMSDOS for disk machines) from a ROM
    /// set. Missing AMSDOS leaves slot 7 empty; the machine still boots.
    pub fn load_rom_set(&mut self, set: &RomSet, variant: RomVariant) -> Result<(), RomLoadError> {
        let name = firmware_rom_name(self.model, variant);
        let data = set.require_sized(name, 2 * BANK_SIZE)?;
        self.board.rom.copy_from_slice(data);

        if self.board.cpc_disk {
            if let Some(amsdos) = set.optional_sized(AMSDOS_ROM_NAME, BANK_SIZE)? {
                self.insert_expansion_rom(AMSDOS_SLOT, amsdos)?;
            }
        }

        self.reset();
        Ok(())
    }

    /// Install a 16 KiB expansion ROM image in a numbered slot.
    pub fn insert_expansion_rom(&mut self, slot: u8, data: &[u8]) -> Result<(), RomLoadError> {
        if data.len() != BANK_SIZE {
            return Err(RomLoadError::SizeMismatch {
                file: format!("slot {slot}"),
                expected: BANK_SIZE,
                actual: data.len(),
            });
        }
        self.board.ext.insert(slot, data.to_vec());
        self.board.ext_ready[slot as usize] = true;
        Ok(())
    }

    pub fn set_crtc_type(&mut self, chip_type: u8) {
        self.board.ga.crtc = Crtc6845::new(chip_type);
    }

    pub fn set_stereo(&mut self, stereo: StereoMode) {
        self.stereo = stereo;
    }

    pub fn set_scan_mode(&mut self, mode: ScanMode) {
        self.board.ga.set_scan_mode(mode);
    }

    /// Select the PSG DAC curve: true for AY-3-8910, false for YM2149.
    pub fn set_psg_chip(&mut self, aychip: bool) {
        self.board.psg.set_volume_levels(aychip);
    }

    pub fn set_psg_sound(&mut self, play: bool) {
        self.board.psg.play_sound = play;
    }

    pub fn set_tape_sound(&mut self, on: bool) {
        self.board.tape_sound = on;
    }

    pub fn set_brand(&mut self, brand: u8) {
        self.board.brand = brand & 0x07;
    }

    /// Compute the audio decimation constants. With `sync_to_video` the
    /// sample clock is stretched so a host-synced frame still yields a full
    /// frame of audio.
    pub fn set_sound_rate(&mut self, frame_time: u32, sync_to_video: bool) {
        let mut value = BASE_CLOCK as f64 / SAMPLE_RATE as f64;
        if sync_to_video {
            let factor = FRAME_TIME_50HZ as f64 / frame_time as f64;
            value /= factor;
        }
        self.skip = value as u32;
        self.tail = ((value - self.skip as f64) * 1_000_000.0) as u32;
        if self.skip_cycles == 0 || self.skip_cycles > self.skip {
            self.skip_cycles = self.skip;
        }
    }

    /// Advance the machine either to the next frame boundary or for one
    /// frame's worth of master ticks.
    pub fn run(&mut self, frame_boundary: bool) {
        self.cycles = 0;
        self.board.ga.sync = false;

        if frame_boundary {
            while !self.board.ga.sync {
                self.clock();
                self.generate_sound();
                self.cycles += 1;
            }
        } else {
            while self.cycles < 16 * FRAME_TIME {
                self.clock();
                self.generate_sound();
                self.cycles += 1;
            }
        }
    }

    /// One 16 MHz master tick. Side-effect order within the tick: video
    /// fetch, Gate Array (which clocks the CRTC), PSG and FDC clocks, then
    /// the CPU at its T-state boundary.
    pub fn clock(&mut self) {
        let board = &mut self.board;

        // The address multiplexer presents the CRTC address to RAM; the
        // fetched byte rides the Gate Array data latch. The RAM slice is
        // only borrowed for this sub-tick.
        let fetch = (board.ga.crtc.byte_address | board.ga.seq.cclk_bit() as u32) as usize;
        board.ga.d = board.ram[fetch & (RAM_SIZE - 1)];

        board.ga.clock();

        if board.ga.seq.psg_clock() {
            board.psg.clock();
        }

        if board.cpc_disk && board.ga.seq.fdc_clock() {
            board.fdc.clock();
        }

        if board.ga.seq.cpu_edge() {
            board.tape_clock();
        }

        if board.ga.seq.cpu_tick() {
            self.cpu.execute_cycle(board, BusMaster::Cpu(0));
        }
    }

    fn generate_sound(&mut self) {
        self.skip_cycles -= 1;
        if self.skip_cycles == 0 {
            self.skip_cycles = self.skip;
            self.remaining += self.tail;
            if self.remaining >= 1_000_000 {
                self.skip_cycles += 1;
                self.remaining -= 1_000_000;
            }
            self.sample();
        }
    }

    /// Mix one stereo sample: averaged tape buzz minus the PSG channels,
    /// routed per the stereo mode.
    fn sample(&mut self) {
        let sound = self.board.buzz_level();
        let mut l = sound;
        let mut r = sound;

        self.board.psg.sample();
        let (a, b, c) = (
            self.board.psg.channel_a,
            self.board.psg.channel_b,
            self.board.psg.channel_c,
        );

        match self.stereo {
            StereoMode::Acb => {
                l -= a;
                l -= c;
                r -= b;
                r -= c;
            }
            StereoMode::Abc => {
                l -= a;
                l -= b;
                r -= b;
                r -= c;
            }
            StereoMode::Mono => {
                l -= a + b + c;
                r -= a + b + c;
            }
        }

        // The queue is the back-pressure boundary: when the host does not
        // drain fast enough, samples are dropped.
        if self.audio.len() + 2 <= AUDIO_QUEUE_MAX {
            self.audio.push_back(l.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
            self.audio.push_back(r.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
        }
    }

    pub fn cpu(&self) -> &Z80 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Z80 {
        &mut self.cpu
    }
}

impl Machine for Cpc {
    fn display_size(&self) -> (u32, u32) {
        match self.board.ga.scan_mode() {
            ScanMode::Single => (X_SIZE as u32, (Y_SIZE / 2) as u32),
            _ => (X_SIZE as u32, (Y_SIZE - 1) as u32),
        }
    }

    fn run_frame(&mut self) {
        self.run(true);
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        let (width, height) = self.display_size();
        let pixels = match self.board.ga.scan_mode() {
            ScanMode::Single => self.board.ga.pixels_x1(),
            _ => self.board.ga.pixels_x2(),
        };
        let count = (width * height) as usize;
        for (i, &pixel) in pixels[..count].iter().enumerate() {
            let [red, green, blue, _alpha] = pixel.to_le_bytes();
            buffer[i * 3] = red;
            buffer[i * 3 + 1] = green;
            buffer[i * 3 + 2] = blue;
        }
    }

    fn set_input(&mut self, key: u8, pressed: bool) {
        let row = (key >> 3) as usize;
        let bit = key & 0x07;
        if row < self.board.keys.len() {
            if pressed {
                self.board.keys[row] &= !(1 << bit);
            } else {
                self.board.keys[row] |= 1 << bit;
            }
        }
    }

    fn input_map(&self) -> &[InputKey] {
        CPC_INPUT_MAP
    }

    fn reset(&mut self) {
        self.board.ga.reset();
        self.board.select_ram(0);
        self.board.rom_bank = 0;
        self.board.upper = UpperRom::Builtin;

        self.cpu.reset();
        self.board.psg.reset();
        self.board.psg.seed = 0xFFFF;
        self.board.fdc.reset();
        self.board.ppi.write_control(0x9B);

        self.board.tape_level = 0;
        self.board.relay = false;
        self.board.tape_speed = 0;
    }

    fn fill_audio(&mut self, buffer: &mut [i16]) -> usize {
        let mut written = 0;
        for slot in buffer.iter_mut() {
            match self.audio.pop_front() {
                Some(sample) => {
                    *slot = sample;
                    written += 1;
                }
                None => break,
            }
        }
        written
    }

    fn audio_sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn frame_rate_hz(&self) -> f64 {
        1_000_000.0 / FRAME_TIME as f64
    }
}
