//! The Dense representation: a fixed-length array of `m` registers packed
//! `regwidth` bits apiece.

use crate::bitstream::BitCursor;
use crate::params::Params;

#[derive(Debug, Clone, PartialEq)]
pub struct DenseRegisters {
    pub(crate) params: Params,
    buf: Vec<u8>,
}

impl DenseRegisters {
    pub fn new(params: Params) -> Self {
        let byte_len = crate::bitstream::packed_byte_len(params.m() as usize, params.regwidth as u32);
        Self {
            params,
            buf: vec![0; byte_len],
        }
    }

    /// Dense insertion rule: `idx = token & (m-1)`, `w = token >> log2m`,
    /// `p = 0` if `w == 0` else `trailing_zeros(w) + 1`, clamped to `maxreg`,
    /// then `register[idx] = max(register[idx], p)`.
    pub fn add(&mut self, token: u64) {
        let substream = token >> self.params.log2m;
        if substream == 0 {
            // p(0) is undefined by the paper; 0 is also the register's rest
            // value, so this token is simply ignored.
            return;
        }

        let p = (1 + (substream | self.params.pw_max_mask()).trailing_zeros()) as u8;
        let idx = (token & self.params.m_bits_mask()) as u32;
        self.set_if_greater(idx, p);
    }

    pub fn set_if_greater(&mut self, reg_num: u32, value: u8) {
        let current = self.get(reg_num);
        if value > current {
            self.set_reg(reg_num, value);
        }
    }

    pub fn get(&self, reg_num: u32) -> u8 {
        let mut cursor = self.cursor_at(reg_num);
        cursor.read(&self.buf) as u8
    }

    pub fn set_reg(&mut self, reg_num: u32, value: u8) {
        let mut cursor = self.cursor_at(reg_num);
        cursor.write(&mut self.buf, value as u64);
    }

    fn cursor_at(&self, reg_num: u32) -> BitCursor {
        // BitCursor advances sequentially; to seek directly to register
        // `reg_num` we replay `reg_num` field-widths worth of advancement
        // via its public byte/bit math instead of exposing mutable seek
        // state — cheapest correct option is reconstructing by bit offset.
        let bit_offset = reg_num as u64 * self.params.regwidth as u64;
        BitCursor::at_bit_offset(self.params.regwidth as u32, bit_offset)
    }

    pub fn union_explicit(&mut self, explicit: &crate::explicit::ExplicitStorage) {
        for token in explicit.iter() {
            self.add(token);
        }
    }

    /// Merges the non-zero `(index, value)` pairs of a decoded Sparse frame.
    pub fn union_sparse_pairs(&mut self, pairs: impl Iterator<Item = (u32, u8)>) {
        for (idx, value) in pairs {
            self.set_if_greater(idx, value);
        }
    }

    /// Register-wise max with another Dense bank of identical length.
    /// Fails `Data` if the register counts differ.
    pub fn union_dense(&mut self, other: &Self) -> Result<(), crate::error::HllError> {
        if self.params.m() != other.params.m() {
            return Err(crate::error::HllError::Data(format!(
                "dense union register count mismatch: {} vs {}",
                self.params.m(),
                other.params.m()
            )));
        }
        for (idx, value) in other.iter() {
            self.set_if_greater(idx, value);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        (0..self.params.m()).map(move |i| (i, self.get(i)))
    }

    /// Harmonic sum `Σ 2^(-r[i])` and count of zero registers, the raw
    /// inputs to the cardinality estimator.
    pub fn indicator(&self) -> (f64, u32) {
        let mut sum = 0.0;
        let mut zeros = 0u32;
        for (_, value) in self.iter() {
            sum += 1.0 / ((1u64 << value) as f64);
            if value == 0 {
                zeros += 1;
            }
        }
        (sum, zeros)
    }

    pub fn nonzero_count(&self) -> usize {
        self.iter().filter(|&(_, v)| v != 0).count()
    }

    pub fn bytes_len(&self) -> usize {
        self.buf.len()
    }

    pub fn to_bytes(&self, buf: &mut [u8]) {
        buf[..self.buf.len()].copy_from_slice(&self.buf);
    }

    pub fn from_bytes(params: Params, buf: &[u8]) -> Result<Self, crate::error::HllError> {
        let mut res = Self::new(params);
        if buf.len() != res.buf.len() {
            return Err(crate::error::HllError::Data(format!(
                "dense body length {} does not match expected {}",
                buf.len(),
                res.buf.len()
            )));
        }
        res.buf.copy_from_slice(buf);
        Ok(res)
    }
}
