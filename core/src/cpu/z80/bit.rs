use crate::core::{Bus, BusMaster};
use crate::cpu::z80::{FLAG_C, FLAG_H, FLAG_PV, FLAG_S, FLAG_X, FLAG_Y, FLAG_Z, Z80, alu};

impl Z80 {
    /// Rotate/shift select: RLC, RRC, RL, RR, SLA, SRA, SLL, SRL.
    /// SLL is the undocumented shift that feeds a 1 into bit 0.
    fn do_rot(&mut self, rot: u8, val: u8) -> u8 {
        let old_carry = self.f & FLAG_C;
        let (result, carry) = match rot {
            0 => ((val << 1) | (val >> 7), val >> 7),
            1 => ((val >> 1) | (val << 7), val & 1),
            2 => ((val << 1) | old_carry, val >> 7),
            3 => ((val >> 1) | (old_carry << 7), val & 1),
            4 => (val << 1, val >> 7),
            5 => ((val >> 1) | (val & 0x80), val & 1),
            6 => ((val << 1) | 1, val >> 7),
            7 => (val >> 1, val & 1),
            _ => unreachable!(),
        };

        let mut f = carry | (result & (FLAG_X | FLAG_Y | FLAG_S));
        if result == 0 {
            f |= FLAG_Z;
        }
        if alu::parity(result) {
            f |= FLAG_PV;
        }
        self.f = f;
        result
    }

    /// BIT b: Z and P/V reflect the tested bit, H set, N clear, C preserved.
    /// X/Y come from the examined byte (or the address high byte for the
    /// memory forms, which is what the silicon exposes).
    fn do_bit(&mut self, bitnum: u8, val: u8, xy_source: u8) {
        let tested = val & (1 << bitnum);
        let mut f = (self.f & FLAG_C) | FLAG_H | (xy_source & (FLAG_X | FLAG_Y));
        if tested == 0 {
            f |= FLAG_Z | FLAG_PV;
        }
        if tested & 0x80 != 0 {
            f |= FLAG_S;
        }
        self.f = f;
    }

    /// CB-prefixed opcode execution. Returns total T-states including both
    /// M1 fetches.
    pub(crate) fn exec_cb<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        op: u8,
        bus: &mut B,
        master: BusMaster,
    ) -> u32 {
        let group = op >> 6;
        let num = (op >> 3) & 0x07; // rotation select or bit number
        let reg = op & 0x07;

        if reg == 6 {
            let addr = self.get_hl();
            let val = bus.read(master, addr);
            match group {
                0 => {
                    let result = self.do_rot(num, val);
                    bus.write(master, addr, result);
                    15
                }
                1 => {
                    self.do_bit(num, val, (addr >> 8) as u8);
                    12
                }
                2 => {
                    bus.write(master, addr, val & !(1 << num));
                    15
                }
                _ => {
                    bus.write(master, addr, val | (1 << num));
                    15
                }
            }
        } else {
            match group {
                0 => {
                    let result = self.do_rot(num, self.get_reg8(reg));
                    self.set_reg8(reg, result);
                }
                1 => {
                    let val = self.get_reg8(reg);
                    self.do_bit(num, val, val);
                }
                2 => {
                    let val = self.get_reg8(reg) & !(1 << num);
                    self.set_reg8(reg, val);
                }
                _ => {
                    let val = self.get_reg8(reg) | (1 << num);
                    self.set_reg8(reg, val);
                }
            }
            8
        }
    }

    /// DD CB d op / FD CB d op. Every form operates on (IX+d); for the
    /// non-BIT groups a register field other than 6 additionally receives a
    /// copy of the result (undocumented).
    pub(crate) fn exec_index_cb<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        op: u8,
        d: i8,
        bus: &mut B,
        master: BusMaster,
    ) -> u32 {
        let base = match self.index {
            super::IndexMode::Ix => self.ix,
            super::IndexMode::Iy => self.iy,
            super::IndexMode::Hl => self.get_hl(),
        };
        let addr = base.wrapping_add(d as i16 as u16);
        self.memptr = addr;

        let group = op >> 6;
        let num = (op >> 3) & 0x07;
        let reg = op & 0x07;

        let val = bus.read(master, addr);
        match group {
            0 => {
                let result = self.do_rot(num, val);
                bus.write(master, addr, result);
                if reg != 6 {
                    self.set_reg8(reg, result);
                }
                23
            }
            1 => {
                self.do_bit(num, val, (addr >> 8) as u8);
                20
            }
            2 => {
                let result = val & !(1 << num);
                bus.write(master, addr, result);
                if reg != 6 {
                    self.set_reg8(reg, result);
                }
                23
            }
            _ => {
                let result = val | (1 << num);
                bus.write(master, addr, result);
                if reg != 6 {
                    self.set_reg8(reg, result);
                }
                23
            }
        }
    }
}
