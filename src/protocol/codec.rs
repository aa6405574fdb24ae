//! Encode/Decode traits untuk tipe yang bisa masuk ke ByteStream
//!
//! Crate ini hanya mengimplementasikan tipe primitif, string, dan wide
//! string. Tipe komposit milik aplikasi (misalnya vector 3 float) cukup
//! mengimplementasikan trait ini sebagai urutan write/read primitif.

use std::ffi::{CStr, CString};

use byteorder::{BigEndian, ByteOrder, NativeEndian};

use super::stream::ByteStream;
use super::wide::WideString;

/// Tipe yang bisa di-serialize ke akhir stream
pub trait Encode {
    fn encode(&self, stream: &mut ByteStream);
}

/// Tipe yang bisa di-deserialize dari cursor stream
///
/// Return `None` jika read gagal; stream sudah ditandai invalid dan nilai
/// tujuan caller tidak boleh diubah.
pub trait Decode: Sized {
    fn decode(stream: &mut ByteStream) -> Option<Self>;
}

impl Encode for bool {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bool(*self);
    }
}

impl Decode for bool {
    #[inline]
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        u8::decode(stream).map(|v| v != 0)
    }
}

impl Encode for i8 {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_i8(*self);
    }
}

impl Decode for i8 {
    #[inline]
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        stream.take_array::<1>().map(i8::from_ne_bytes)
    }
}

impl Encode for u8 {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_u8(*self);
    }
}

impl Decode for u8 {
    #[inline]
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        stream.take_array::<1>().map(|b| b[0])
    }
}

/// Integer multi-byte: write lewat helper stream, read big-endian
macro_rules! impl_network_int {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl Encode for $ty {
                #[inline]
                fn encode(&self, stream: &mut ByteStream) {
                    stream.$write(*self);
                }
            }

            impl Decode for $ty {
                #[inline]
                fn decode(stream: &mut ByteStream) -> Option<Self> {
                    stream
                        .take(std::mem::size_of::<$ty>())
                        .map(BigEndian::$read)
                }
            }
        )*
    };
}

impl_network_int! {
    i16 => write_i16, read_i16;
    u16 => write_u16, read_u16;
    i32 => write_i32, read_i32;
    u32 => write_u32, read_u32;
    i64 => write_i64, read_i64;
    u64 => write_u64, read_u64;
}

impl Encode for f32 {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_f32(*self);
    }
}

impl Decode for f32 {
    #[inline]
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        stream.take(4).map(NativeEndian::read_f32)
    }
}

impl Encode for f64 {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_f64(*self);
    }
}

impl Decode for f64 {
    #[inline]
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        stream.take(8).map(NativeEndian::read_f64)
    }
}

impl Encode for str {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_str(self);
    }
}

impl Encode for String {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_str(self);
    }
}

impl Decode for String {
    /// Bytes disalin apa adanya; urutan bytes yang bukan UTF-8 valid
    /// diganti U+FFFD. Pakai `read_cstr_into` untuk bytes mentah.
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        let len = stream.take_len()? as usize;
        if len == 0 {
            return Some(String::new());
        }
        let bytes = stream.take(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Encode for CStr {
    /// Tulis bytes sebelum terminator
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(self.to_bytes());
    }
}

impl Encode for CString {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(self.as_bytes());
    }
}

impl Encode for WideString {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_wide(self.units());
    }
}

impl Decode for WideString {
    fn decode(stream: &mut ByteStream) -> Option<Self> {
        let count = stream.take_len()? as usize;
        if count == 0 {
            return Some(WideString::new());
        }
        let bytes = stream.take(count.saturating_mul(4))?;
        let units = bytes.chunks_exact(4).map(BigEndian::read_u32).collect();
        Some(WideString::from_units(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Vector3 {
        x: f32,
        y: f32,
        z: f32,
    }

    impl Encode for Vector3 {
        fn encode(&self, stream: &mut ByteStream) {
            stream.write_f32(self.x).write_f32(self.y).write_f32(self.z);
        }
    }

    impl Decode for Vector3 {
        fn decode(stream: &mut ByteStream) -> Option<Self> {
            // Cek semua 12 bytes dulu supaya tidak ada partial read
            if !stream.check_size(12) {
                return None;
            }
            Some(Self {
                x: f32::decode(stream)?,
                y: f32::decode(stream)?,
                z: f32::decode(stream)?,
            })
        }
    }

    #[test]
    fn test_string_framing() {
        let mut stream = ByteStream::new();
        stream.write("hi");
        assert_eq!(stream.as_bytes(), &[0x00, 0x00, 0x00, 0x02, 0x68, 0x69]);

        let mut decoded = String::new();
        stream.read(&mut decoded);
        assert_eq!(decoded, "hi");
        assert!(stream.end_of_stream());
    }

    #[test]
    fn test_wide_framing() {
        let mut stream = ByteStream::new();
        stream.write(&WideString::from_units(vec![0x41]));
        assert_eq!(
            stream.as_bytes(),
            &[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x41]
        );

        let decoded: WideString = stream.get().unwrap();
        assert_eq!(decoded.units(), &[0x41]);
    }

    #[test]
    fn test_cstr_matches_str_framing() {
        let c = CString::new("abc").unwrap();
        let mut a = ByteStream::new();
        a.write(c.as_c_str());
        let mut b = ByteStream::new();
        b.write("abc");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_empty_string_is_just_prefix() {
        let mut stream = ByteStream::new();
        stream.write("");
        assert_eq!(stream.as_bytes(), &[0, 0, 0, 0]);

        let mut out = String::from("old");
        stream.read(&mut out);
        assert_eq!(out, "");
        assert!(stream.is_valid());
    }

    #[test]
    fn test_truncated_string_payload() {
        let mut stream = ByteStream::from_bytes(&[0, 0, 0, 5, b'a', b'b']);
        let mut out = String::from("old");
        stream.read(&mut out);

        assert_eq!(out, "old");
        assert!(!stream.is_valid());
        // Length prefix sudah terbaca, payload tidak
        assert_eq!(stream.position(), 4);
    }

    #[test]
    fn test_hostile_wide_count_reads_nothing() {
        let mut stream = ByteStream::from_bytes(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0x41]);
        let decoded = stream.get::<WideString>();

        assert!(decoded.is_none());
        assert!(!stream.is_valid());
        assert_eq!(stream.position(), 4);
    }

    #[test]
    fn test_user_composite_type() {
        let v = Vector3 {
            x: 8.1,
            y: -9.11,
            z: 2.083,
        };
        let mut stream = ByteStream::new();
        stream.write(&v);
        assert_eq!(stream.len(), 12);

        let mut out = Vector3::default();
        stream.read(&mut out);
        assert_eq!(out, v);
    }

    #[test]
    fn test_signed_ints_big_endian() {
        let mut stream = ByteStream::new();
        stream.write(&-2i16).write(&-1i32).write(&i64::MIN);
        assert_eq!(&stream.as_bytes()[..2], &[0xFF, 0xFE]);
        assert_eq!(&stream.as_bytes()[2..6], &[0xFF; 4]);
        assert_eq!(&stream.as_bytes()[6..], &[0x80, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(stream.get::<i16>(), Some(-2));
        assert_eq!(stream.get::<i32>(), Some(-1));
        assert_eq!(stream.get::<i64>(), Some(i64::MIN));
    }
}
