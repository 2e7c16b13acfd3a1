use crate::core::{Bus, BusMaster};
use crate::cpu::z80::{
    FLAG_C, FLAG_H, FLAG_N, FLAG_PV, FLAG_S, FLAG_X, FLAG_Y, FLAG_Z, Z80, alu,
};

impl Z80 {
    /// ED-prefixed opcode execution. Returns total T-states including both
    /// M1 fetches. Undefined ED opcodes act as 8 T NOPs.
    pub(crate) fn exec_ed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        op: u8,
        bus: &mut B,
        master: BusMaster,
    ) -> u32 {
        match op {
            // LD I,A / LD R,A
            0x47 => {
                self.i = self.a;
                9
            }
            0x4F => {
                self.r = self.a;
                9
            }

            // LD A,I / LD A,R — P/V reflects IFF2
            0x57 => {
                self.a = self.i;
                self.flags_ir();
                9
            }
            0x5F => {
                self.a = self.r;
                self.flags_ir();
                9
            }

            // RRD / RLD — nibble rotates through (HL)
            0x67 => {
                let addr = self.get_hl();
                let mem = bus.read(master, addr);
                bus.write(master, addr, (self.a << 4) | (mem >> 4));
                self.a = (self.a & 0xF0) | (mem & 0x0F);
                self.flags_rxd();
                self.memptr = addr.wrapping_add(1);
                18
            }
            0x6F => {
                let addr = self.get_hl();
                let mem = bus.read(master, addr);
                bus.write(master, addr, (mem << 4) | (self.a & 0x0F));
                self.a = (self.a & 0xF0) | (mem >> 4);
                self.flags_rxd();
                self.memptr = addr.wrapping_add(1);
                18
            }

            // Block transfer / compare / I/O
            0xA0 | 0xA8 => {
                self.op_ldx(op & 0x08 != 0, bus, master);
                16
            }
            0xA1 | 0xA9 => {
                self.op_cpx(op & 0x08 != 0, bus, master);
                16
            }
            0xA2 | 0xAA => {
                self.op_inx(op & 0x08 != 0, bus, master);
                16
            }
            0xA3 | 0xAB => {
                self.op_outx(op & 0x08 != 0, bus, master);
                16
            }
            0xB0 | 0xB8 => {
                self.op_ldx(op & 0x08 != 0, bus, master);
                if self.get_bc() != 0 {
                    self.pc = self.pc.wrapping_sub(2);
                    self.memptr = self.pc.wrapping_add(1);
                    21
                } else {
                    16
                }
            }
            0xB1 | 0xB9 => {
                self.op_cpx(op & 0x08 != 0, bus, master);
                if self.get_bc() != 0 && self.f & FLAG_Z == 0 {
                    self.pc = self.pc.wrapping_sub(2);
                    self.memptr = self.pc.wrapping_add(1);
                    21
                } else {
                    16
                }
            }
            0xB2 | 0xBA => {
                self.op_inx(op & 0x08 != 0, bus, master);
                if self.b != 0 {
                    self.pc = self.pc.wrapping_sub(2);
                    21
                } else {
                    16
                }
            }
            0xB3 | 0xBB => {
                self.op_outx(op & 0x08 != 0, bus, master);
                if self.b != 0 {
                    self.pc = self.pc.wrapping_sub(2);
                    21
                } else {
                    16
                }
            }

            // IN r,(C) — r=6 sets flags only (IN F,(C))
            op if (op & 0xC7) == 0x40 => {
                let port = self.get_bc();
                let val = bus.io_read(master, port);
                let r = (op >> 3) & 0x07;
                if r != 6 {
                    self.set_reg8(r, val);
                }
                self.flags_in(val);
                self.memptr = port.wrapping_add(1);
                12
            }

            // OUT (C),r — r=6 outputs 0 (NMOS behavior)
            op if (op & 0xC7) == 0x41 => {
                let port = self.get_bc();
                let r = (op >> 3) & 0x07;
                let val = if r == 6 { 0 } else { self.get_reg8(r) };
                bus.io_write(master, port, val);
                self.memptr = port.wrapping_add(1);
                12
            }

            // SBC HL,rr / ADC HL,rr
            op if (op & 0xCF) == 0x42 => {
                let rhs = self.get_rp_plain((op >> 4) & 0x03);
                self.op_sbc16(rhs);
                15
            }
            op if (op & 0xCF) == 0x4A => {
                let rhs = self.get_rp_plain((op >> 4) & 0x03);
                self.op_adc16(rhs);
                15
            }

            // LD (nn),rr / LD rr,(nn)
            op if (op & 0xCF) == 0x43 => {
                let addr = self.imm16(bus, master);
                let val = self.get_rp_plain((op >> 4) & 0x03);
                self.write16(bus, master, addr, val);
                self.memptr = addr.wrapping_add(1);
                20
            }
            op if (op & 0xCF) == 0x4B => {
                let addr = self.imm16(bus, master);
                let val = self.read16(bus, master, addr);
                self.set_rp_plain((op >> 4) & 0x03, val);
                self.memptr = addr.wrapping_add(1);
                20
            }

            // NEG (and its mirrors)
            op if (op & 0xC7) == 0x44 => {
                self.op_neg();
                8
            }

            // RETN / RETI
            op if (op & 0xC7) == 0x45 => {
                self.iff1 = self.iff2;
                self.pc = self.pop16(bus, master);
                self.memptr = self.pc;
                14
            }

            // IM 0/1/2
            op if (op & 0xC7) == 0x46 => {
                self.im = match (op >> 3) & 0x03 {
                    2 => 1,
                    3 => 2,
                    _ => 0,
                };
                8
            }

            _ => 8,
        }
    }

    /// Register pairs for the ED group ignore the DD/FD prefix.
    fn get_rp_plain(&self, index: u8) -> u16 {
        match index {
            0 => self.get_bc(),
            1 => self.get_de(),
            2 => self.get_hl(),
            3 => self.sp,
            _ => unreachable!(),
        }
    }

    fn set_rp_plain(&mut self, index: u8, val: u16) {
        match index {
            0 => self.set_bc(val),
            1 => self.set_de(val),
            2 => self.set_hl(val),
            3 => self.sp = val,
            _ => unreachable!(),
        }
    }

    /// Flags after LD A,I / LD A,R.
    fn flags_ir(&mut self) {
        let mut f = self.f & FLAG_C;
        if self.a == 0 {
            f |= FLAG_Z;
        }
        f |= self.a & (FLAG_S | FLAG_X | FLAG_Y);
        if self.iff2 {
            f |= FLAG_PV;
        }
        self.f = f;
    }

    /// Flags after RRD/RLD: S, Z, parity from A, H = N = 0, C preserved.
    fn flags_rxd(&mut self) {
        let mut f = self.f & FLAG_C;
        if self.a == 0 {
            f |= FLAG_Z;
        }
        f |= self.a & (FLAG_S | FLAG_X | FLAG_Y);
        if alu::parity(self.a) {
            f |= FLAG_PV;
        }
        self.f = f;
    }

    /// LDI / LDD one step. X/Y come from bits 3 and 1 of (transferred + A).
    fn op_ldx<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        decrement: bool,
        bus: &mut B,
        master: BusMaster,
    ) {
        let hl = self.get_hl();
        let de = self.get_de();
        let val = bus.read(master, hl);
        bus.write(master, de, val);

        let step = if decrement { 0xFFFFu16 } else { 1 };
        self.set_hl(hl.wrapping_add(step));
        self.set_de(de.wrapping_add(step));
        let bc = self.get_bc().wrapping_sub(1);
        self.set_bc(bc);

        let n = val.wrapping_add(self.a);
        let mut f = self.f & (FLAG_S | FLAG_Z | FLAG_C);
        if n & 0x08 != 0 {
            f |= FLAG_X;
        }
        if n & 0x02 != 0 {
            f |= FLAG_Y;
        }
        if bc != 0 {
            f |= FLAG_PV;
        }
        self.f = f;
    }

    /// CPI / CPD one step. X/Y come from bits 3 and 1 of (A - value - H).
    fn op_cpx<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        decrement: bool,
        bus: &mut B,
        master: BusMaster,
    ) {
        let hl = self.get_hl();
        let val = bus.read(master, hl);
        let result = self.a.wrapping_sub(val);

        let step = if decrement { 0xFFFFu16 } else { 1 };
        self.set_hl(hl.wrapping_add(step));
        let bc = self.get_bc().wrapping_sub(1);
        self.set_bc(bc);
        self.memptr = self.memptr.wrapping_add(step);

        let mut f = (self.f & FLAG_C) | FLAG_N;
        if result == 0 {
            f |= FLAG_Z;
        }
        f |= result & FLAG_S;
        let half = (self.a & 0x0F) < (val & 0x0F);
        if half {
            f |= FLAG_H;
        }
        if bc != 0 {
            f |= FLAG_PV;
        }
        let n = result.wrapping_sub(if half { 1 } else { 0 });
        if n & 0x08 != 0 {
            f |= FLAG_X;
        }
        if n & 0x02 != 0 {
            f |= FLAG_Y;
        }
        self.f = f;
    }

    /// INI / IND one step. The port address uses B before the decrement.
    fn op_inx<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        decrement: bool,
        bus: &mut B,
        master: BusMaster,
    ) {
        let port = self.get_bc();
        let val = bus.io_read(master, port);
        let hl = self.get_hl();
        bus.write(master, hl, val);

        let step = if decrement { 0xFFFFu16 } else { 1 };
        self.memptr = port.wrapping_add(step);
        self.b = self.b.wrapping_sub(1);
        self.set_hl(hl.wrapping_add(step));

        self.flags_block_io(val, self.c.wrapping_add(if decrement { 0xFF } else { 1 }));
    }

    /// OUTI / OUTD one step. B is decremented before the port write.
    fn op_outx<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        decrement: bool,
        bus: &mut B,
        master: BusMaster,
    ) {
        let hl = self.get_hl();
        let val = bus.read(master, hl);
        self.b = self.b.wrapping_sub(1);
        let port = self.get_bc();
        bus.io_write(master, port, val);

        let step = if decrement { 0xFFFFu16 } else { 1 };
        self.memptr = port.wrapping_add(step);
        self.set_hl(hl.wrapping_add(step));

        let l = self.l;
        self.flags_block_io(val, l);
    }

    /// Shared flag logic for the block I/O group: S, Z, X, Y from B; N from
    /// bit 7 of the transferred byte; H and C from the 9-bit sum of the byte
    /// and the derived counter operand; P/V is parity of that sum folded
    /// with B.
    fn flags_block_io(&mut self, val: u8, operand: u8) {
        let mut f = self.b & (FLAG_S | FLAG_X | FLAG_Y);
        if self.b == 0 {
            f |= FLAG_Z;
        }
        if val & 0x80 != 0 {
            f |= FLAG_N;
        }
        let sum = val as u16 + operand as u16;
        if sum > 0xFF {
            f |= FLAG_H | FLAG_C;
        }
        if alu::parity((sum as u8 & 0x07) ^ self.b) {
            f |= FLAG_PV;
        }
        self.f = f;
    }
}
