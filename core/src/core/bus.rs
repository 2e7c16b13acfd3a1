/// Identifies who is accessing the bus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusMaster {
    Cpu(usize), // CPU 0, CPU 1, etc.
    Video,      // Video fetch through the address multiplexer (sees raw RAM,
                // never the ROM overlays)
}

/// Generic bus interface for 8-bit systems with a separate I/O space.
pub trait Bus {
    type Address: Copy + Into<u64>; // u16 for 8-bit systems
    type Data; // u8

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Read from I/O port address space (separate from memory on Z80).
    /// Default maps to memory read; override for CPUs with separate I/O.
    fn io_read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data {
        self.read(master, addr)
    }

    /// Write to I/O port address space (separate from memory on Z80).
    /// Default maps to memory write; override for CPUs with separate I/O.
    fn io_write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data) {
        self.write(master, addr, data)
    }

    /// Interrupt-acknowledge cycle (M1 + IORQ both active). Returns the byte
    /// the interrupting device places on the data bus; on an open bus this is
    /// 0xFF. Devices that count pending interrupts clear them here.
    fn interrupt_ack(&mut self, master: BusMaster) -> Self::Data;

    /// Check if the bus is halted for this master (WAIT/BUSREQ).
    /// Returns true if the master must pause before the next bus cycle.
    fn is_halted_for(&self, master: BusMaster) -> bool;

    /// Generic interrupt query. CPUs pick what they need.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;
}

#[derive(Default, Clone, Copy, Debug)]
pub struct InterruptState {
    pub nmi: bool,
    pub irq: bool,
}
