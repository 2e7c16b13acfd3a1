/// NEC uPD765A floppy disk controller, at its port contract.
///
/// The CPU sees two registers: the main status register and the data
/// register. Commands move the controller through command, execution and
/// result phases; the phase is reported through the RQM/DIO/CB bits of the
/// main status register. Media handling (disk images, seeks against real
/// track data) lives outside the core; without a mounted image every
/// command completes with "equipment check / not ready" result bytes,
/// which is exactly what an empty drive bay reports.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Command,
    Result,
}

// Main status register bits.
const MSR_RQM: u8 = 0x80; // Request for master
const MSR_DIO: u8 = 0x40; // Data direction: set = FDC to CPU
const MSR_CB: u8 = 0x10; // Controller busy

// ST0 result bits.
const ST0_IC_ABNORMAL: u8 = 0x40;
const ST0_NOT_READY: u8 = 0x08;

/// Bytes expected after each command opcode (low 5 bits), per the uPD765A
/// datasheet. Invalid opcodes take no parameters.
fn command_length(opcode: u8) -> usize {
    match opcode & 0x1F {
        0x02 => 9, // Read track
        0x03 => 3, // Specify
        0x04 => 2, // Sense drive status
        0x05 | 0x09 => 9, // Write data / write deleted
        0x06 | 0x0C => 9, // Read data / read deleted
        0x07 => 2, // Recalibrate
        0x08 => 1, // Sense interrupt status
        0x0A => 2, // Read ID
        0x0D => 6, // Format track
        0x0F => 3, // Seek
        0x11 | 0x19 | 0x1D => 9, // Scan variants
        _ => 1, // Invalid
    }
}

pub struct Fdc765 {
    phase: Phase,
    command: [u8; 9],
    command_len: usize,
    command_expected: usize,
    result: [u8; 7],
    result_len: usize,
    result_pos: usize,

    pub motor: bool,
    /// Clock scaling hook for the 664/6128 board wiring.
    pub clock_frequency: f64,

    /// Pending sense-interrupt status after recalibrate/seek.
    int_pending: bool,
    present_cylinder: u8,
}

impl Fdc765 {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            command: [0; 9],
            command_len: 0,
            command_expected: 0,
            result: [0; 7],
            result_len: 0,
            result_pos: 0,
            motor: false,
            clock_frequency: 4.0,
            int_pending: false,
            present_cylinder: 0,
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.command_len = 0;
        self.result_len = 0;
        self.result_pos = 0;
        self.motor = false;
        self.int_pending = false;
        self.present_cylinder = 0;
    }

    /// Main status register read (&FB7E).
    pub fn status(&self) -> u8 {
        match self.phase {
            Phase::Idle => MSR_RQM,
            Phase::Command => MSR_RQM | MSR_CB,
            Phase::Result => MSR_RQM | MSR_DIO | MSR_CB,
        }
    }

    /// Data register write (&FB7F).
    pub fn write(&mut self, byte: u8) {
        match self.phase {
            Phase::Idle => {
                self.command[0] = byte;
                self.command_len = 1;
                self.command_expected = command_length(byte);
                if self.command_len == self.command_expected {
                    self.execute();
                } else {
                    self.phase = Phase::Command;
                }
            }
            Phase::Command => {
                if self.command_len < self.command.len() {
                    self.command[self.command_len] = byte;
                }
                self.command_len += 1;
                if self.command_len >= self.command_expected {
                    self.execute();
                }
            }
            Phase::Result => {} // Writes during the result phase are ignored
        }
    }

    /// Data register read (&FB7F).
    pub fn read(&mut self) -> u8 {
        if self.phase != Phase::Result {
            return 0xFF;
        }
        let byte = self.result[self.result_pos];
        self.result_pos += 1;
        if self.result_pos >= self.result_len {
            self.phase = Phase::Idle;
        }
        byte
    }

    /// Motor relay write (&FA7E).
    pub fn set_motor(&mut self, on: bool) {
        self.motor = on;
    }

    /// 8 MHz clock input. Command turnaround is modelled as immediate, so
    /// this only exists to keep the chip in the master clock fabric.
    pub fn clock(&mut self) {}

    fn execute(&mut self) {
        let opcode = self.command[0] & 0x1F;
        let drive = self.command.get(1).copied().unwrap_or(0) & 0x03;

        match opcode {
            // Specify: no result phase.
            0x03 => {
                self.phase = Phase::Idle;
                self.command_len = 0;
            }

            // Sense drive status: ST3 only.
            0x04 => {
                // Write-protected, two-sided flags absent: bare drive.
                self.finish(&[drive]);
            }

            // Recalibrate / seek: no result phase, raises an interrupt
            // condition picked up by sense-interrupt.
            0x07 | 0x0F => {
                self.present_cylinder = if opcode == 0x0F {
                    self.command.get(2).copied().unwrap_or(0)
                } else {
                    0
                };
                self.int_pending = true;
                self.phase = Phase::Idle;
                self.command_len = 0;
            }

            // Sense interrupt status.
            0x08 => {
                if self.int_pending {
                    self.int_pending = false;
                    self.finish(&[ST0_IC_ABNORMAL | ST0_NOT_READY, self.present_cylinder]);
                } else {
                    self.finish(&[0x80]); // Invalid: no interrupt pending
                }
            }

            // Data transfer commands: without media the drive is not ready.
            0x02 | 0x05 | 0x06 | 0x09 | 0x0A | 0x0C | 0x0D | 0x11 | 0x19 | 0x1D => {
                let chrn = [
                    self.command.get(2).copied().unwrap_or(0),
                    self.command.get(3).copied().unwrap_or(0),
                    self.command.get(4).copied().unwrap_or(0),
                    self.command.get(5).copied().unwrap_or(0),
                ];
                self.finish(&[
                    ST0_IC_ABNORMAL | ST0_NOT_READY | drive,
                    0x00,
                    0x00,
                    chrn[0],
                    chrn[1],
                    chrn[2],
                    chrn[3],
                ]);
            }

            // Invalid opcode.
            _ => self.finish(&[0x80]),
        }
    }

    fn finish(&mut self, result: &[u8]) {
        self.result[..result.len()].copy_from_slice(result);
        self.result_len = result.len();
        self.result_pos = 0;
        self.phase = Phase::Result;
        self.command_len = 0;
    }
}

impl Default for Fdc765 {
    fn default() -> Self {
        Self::new()
    }
}
