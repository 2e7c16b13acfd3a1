use arnold_core::core::{Bus, BusMaster, bus::InterruptState};

/// Minimal bus for testing: flat 64KB memory plus recorded I/O traffic.
pub struct TestBus {
    pub memory: [u8; 0x10000],
    pub io_writes: Vec<(u16, u8)>,
    pub io_read_value: u8,
    pub irq: bool,
    pub nmi: bool,
    pub acks: u32,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
            io_writes: Vec::new(),
            io_read_value: 0xFF,
            irq: false,
            nmi: false,
            acks: 0,
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }
}

impl Bus for TestBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }

    fn io_read(&mut self, _master: BusMaster, _addr: u16) -> u8 {
        self.io_read_value
    }

    fn io_write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.io_writes.push((addr, data));
    }

    fn interrupt_ack(&mut self, _master: BusMaster) -> u8 {
        self.acks += 1;
        self.irq = false;
        0xFF
    }

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        false
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState {
            nmi: self.nmi,
            irq: self.irq,
        }
    }
}

/// Run whole instructions, returning the number of T-states consumed.
#[allow(dead_code)]
pub fn run_instructions(
    cpu: &mut arnold_core::cpu::z80::Z80,
    bus: &mut TestBus,
    count: usize,
) -> u32 {
    let mut tstates = 0;
    for _ in 0..count {
        loop {
            tstates += 1;
            if cpu.execute_cycle(bus, BusMaster::Cpu(0)) {
                break;
            }
            assert!(tstates < 10_000, "instruction did not complete");
        }
    }
    tstates
}
