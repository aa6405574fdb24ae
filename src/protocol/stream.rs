//! ByteStream: growable buffer dengan typed read/write
//!
//! Layout wire:
//! ┌──────────────────────────────────────────────────────┐
//! │ Integer (16/32/64 bit)  : big-endian (network order) │
//! │ f32 / f64               : host-native, tanpa swap    │
//! │ String / WideString     : u32 BE length + payload    │
//! └──────────────────────────────────────────────────────┘
//!
//! Validity flag bersifat latching: read pertama yang underrun membuat stream
//! invalid sampai `clear()` dipanggil. Write tidak pernah gagal.

use byteorder::{BigEndian, ByteOrder, NativeEndian};

use super::codec::{Decode, Encode};
use super::error::StreamError;
use super::wide::WideString;

/// Default initial capacity buffer
const DEFAULT_CAPACITY: usize = 64;

/// Konfigurasi stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Kapasitas awal buffer (bytes)
    pub initial_capacity: usize,
    /// Batas atas length prefix string/wide string. `None` = tanpa batas,
    /// hanya dibatasi oleh jumlah bytes yang benar-benar ada di buffer.
    pub max_declared_len: Option<u32>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_declared_len: None,
        }
    }
}

/// Serialization buffer dengan read cursor dan validity flag
#[derive(Debug, Clone)]
pub struct ByteStream {
    buffer: Vec<u8>,
    read_pos: usize,
    is_valid: bool,
    error: Option<StreamError>,
    config: StreamConfig,
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStream {
    /// Membuat stream kosong (valid, cursor 0)
    pub fn new() -> Self {
        Self::with_config(StreamConfig::default())
    }

    pub fn with_config(config: StreamConfig) -> Self {
        Self {
            buffer: Vec::with_capacity(config.initial_capacity),
            read_pos: 0,
            is_valid: true,
            error: None,
            config,
        }
    }

    /// Membuat stream dari payload yang diterima (bulk copy)
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut stream = Self::new();
        stream.append(data);
        stream
    }

    #[inline(always)]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Tambahkan raw bytes ke akhir buffer. No-op untuk slice kosong.
    #[inline]
    pub fn append(&mut self, data: &[u8]) {
        if !data.is_empty() {
            self.buffer.extend_from_slice(data);
        }
    }

    /// Reset stream untuk reuse: kosong, cursor 0, valid
    pub fn clear(&mut self) {
        log::trace!(
            "clearing byte stream ({} bytes, cursor {})",
            self.buffer.len(),
            self.read_pos
        );
        self.buffer.clear();
        self.read_pos = 0;
        self.is_valid = true;
        self.error = None;
    }

    /// Read-only view ke buffer, `None` jika kosong
    #[inline(always)]
    pub fn data(&self) -> Option<&[u8]> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(&self.buffer)
        }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Total bytes di buffer
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// Bytes yang belum dibaca
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read_pos)
    }

    #[inline(always)]
    pub fn end_of_stream(&self) -> bool {
        self.read_pos >= self.buffer.len()
    }

    /// True jika semua read sejak `clear()` terakhir berhasil
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Kegagalan pertama sejak `clear()` terakhir
    pub fn last_error(&self) -> Option<&StreamError> {
        self.error.as_ref()
    }

    /// `Ok(())` jika stream masih valid
    pub fn status(&self) -> Result<(), StreamError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Bounds check: bisakah `size` bytes dibaca dari cursor?
    ///
    /// Hasilnya di-AND dengan flag sebelumnya, jadi sekali gagal stream
    /// tetap invalid walaupun read berikutnya sebenarnya muat.
    pub fn check_size(&mut self, size: usize) -> bool {
        if !self.is_valid {
            return false;
        }

        let fits = self
            .read_pos
            .checked_add(size)
            .is_some_and(|end| end <= self.buffer.len());

        if !fits {
            self.invalidate(StreamError::Underrun {
                offset: self.read_pos,
                requested: size,
                available: self.remaining(),
            });
        }

        self.is_valid
    }

    /// Tandai stream invalid. Hanya kegagalan pertama yang dicatat.
    pub(crate) fn invalidate(&mut self, err: StreamError) {
        if self.is_valid {
            log::debug!("byte stream invalidated: {}", err);
            self.error = Some(err);
        }
        self.is_valid = false;
    }

    /// Cek length prefix terhadap `max_declared_len`
    pub(crate) fn check_declared_len(&mut self, declared: u32) -> bool {
        match self.config.max_declared_len {
            Some(limit) if declared > limit => {
                self.invalidate(StreamError::LengthLimit { declared, limit });
                false
            }
            _ => self.is_valid,
        }
    }

    /// Consume `size` bytes dari cursor (zero-copy)
    #[inline]
    pub(crate) fn take(&mut self, size: usize) -> Option<&[u8]> {
        if !self.check_size(size) {
            return None;
        }
        let start = self.read_pos;
        self.read_pos += size;
        Some(&self.buffer[start..start + size])
    }

    #[inline]
    pub(crate) fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Some(out)
    }

    /// Read u32 length prefix plus batas konfigurasi
    pub(crate) fn take_len(&mut self) -> Option<u32> {
        let len = u32::decode(self)?;
        if self.check_declared_len(len) {
            Some(len)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Generic API
    // ------------------------------------------------------------------

    /// Serialize `value` ke akhir buffer
    #[inline]
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(self);
        self
    }

    /// Deserialize ke `out`. Jika gagal, `out` tidak diubah.
    #[inline]
    pub fn read<T: Decode>(&mut self, out: &mut T) -> &mut Self {
        if let Some(value) = T::decode(self) {
            *out = value;
        }
        self
    }

    /// Deserialize dan kembalikan nilainya
    #[inline]
    pub fn get<T: Decode>(&mut self) -> Option<T> {
        T::decode(self)
    }

    // ------------------------------------------------------------------
    // Typed writes
    // ------------------------------------------------------------------

    #[inline]
    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(u8::from(value))
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.append(&value.to_ne_bytes());
        self
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        let mut tmp = [0u8; 2];
        BigEndian::write_i16(&mut tmp, value);
        self.append(&tmp);
        self
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        let mut tmp = [0u8; 2];
        BigEndian::write_u16(&mut tmp, value);
        self.append(&tmp);
        self
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        let mut tmp = [0u8; 4];
        BigEndian::write_i32(&mut tmp, value);
        self.append(&tmp);
        self
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        let mut tmp = [0u8; 4];
        BigEndian::write_u32(&mut tmp, value);
        self.append(&tmp);
        self
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        let mut tmp = [0u8; 8];
        BigEndian::write_i64(&mut tmp, value);
        self.append(&tmp);
        self
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        let mut tmp = [0u8; 8];
        BigEndian::write_u64(&mut tmp, value);
        self.append(&tmp);
        self
    }

    /// f32 ditulis dengan byte order host (tidak di-swap)
    #[inline]
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        let mut tmp = [0u8; 4];
        NativeEndian::write_f32(&mut tmp, value);
        self.append(&tmp);
        self
    }

    /// f64 ditulis dengan byte order host (tidak di-swap)
    #[inline]
    pub fn write_f64(&mut self, value: f64) -> &mut Self {
        let mut tmp = [0u8; 8];
        NativeEndian::write_f64(&mut tmp, value);
        self.append(&tmp);
        self
    }

    /// Narrow string: u32 byte length + raw bytes (tanpa terminator)
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        debug_assert!(bytes.len() <= u32::MAX as usize, "string too long for u32 prefix");
        self.write_u32(bytes.len() as u32);
        self.append(bytes);
        self
    }

    #[inline]
    pub fn write_str(&mut self, value: &str) -> &mut Self {
        self.write_bytes(value.as_bytes())
    }

    /// Wide string: u32 count + satu u32 BE per code unit
    pub fn write_wide(&mut self, units: &[u32]) -> &mut Self {
        debug_assert!(units.len() <= u32::MAX as usize, "string too long for u32 prefix");
        self.write_u32(units.len() as u32);
        self.buffer.reserve(units.len() * 4);
        for &unit in units {
            self.write_u32(unit);
        }
        self
    }

    // ------------------------------------------------------------------
    // Fixed-capacity reads
    // ------------------------------------------------------------------

    /// Decode narrow string ke buffer caller, diakhiri byte 0.
    ///
    /// `dst` harus muat payload + 1 byte terminator. Jika tidak, stream
    /// menjadi invalid dan `dst`/`written` tidak diubah.
    pub fn read_cstr_into(&mut self, dst: &mut [u8], written: &mut usize) -> &mut Self {
        let Some(len) = self.take_len() else {
            return self;
        };
        let len = len as usize;

        if len == 0 {
            // Tidak ada payload, tetap tulis terminator jika ada tempat
            if let Some(first) = dst.first_mut() {
                *first = 0;
            }
            *written = 0;
            return self;
        }

        if !self.check_size(len) {
            return self;
        }
        if len + 1 > dst.len() {
            self.invalidate(StreamError::CapacityExceeded {
                needed: len + 1,
                capacity: dst.len(),
            });
            return self;
        }

        if let Some(bytes) = self.take(len) {
            dst[..len].copy_from_slice(bytes);
            dst[len] = 0;
            *written = len;
        }
        self
    }

    /// Decode wide string ke buffer caller, diakhiri code unit 0.
    pub fn read_wide_into(&mut self, dst: &mut [u32], written: &mut usize) -> &mut Self {
        let Some(count) = self.take_len() else {
            return self;
        };
        let count = count as usize;

        if count == 0 {
            if let Some(first) = dst.first_mut() {
                *first = 0;
            }
            *written = 0;
            return self;
        }

        if !self.check_size(count.saturating_mul(4)) {
            return self;
        }
        if count + 1 > dst.len() {
            self.invalidate(StreamError::CapacityExceeded {
                needed: count + 1,
                capacity: dst.len(),
            });
            return self;
        }

        if let Some(bytes) = self.take(count * 4) {
            for (slot, chunk) in dst.iter_mut().zip(bytes.chunks_exact(4)) {
                *slot = BigEndian::read_u32(chunk);
            }
            dst[count] = 0;
            *written = count;
        }
        self
    }

    /// Decode wide string ke `WideString` milik caller (append)
    pub fn read_wide_append(&mut self, dst: &mut WideString) -> &mut Self {
        if let Some(decoded) = WideString::decode(self) {
            for &unit in decoded.units() {
                dst.push(unit);
            }
        }
        self
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            read_pos: 0,
            is_valid: true,
            error: None,
            config: StreamConfig::default(),
        }
    }
}

impl From<&[u8]> for ByteStream {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data)
    }
}
