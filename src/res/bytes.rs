use crate::res::{ResError, Result};

/// Hard cap on a single declared string length.
pub const MAX_STRING_LEN: usize = 1 << 20;

/// Length-field bit marking an inline (not table-indexed) string inside node paths.
pub const INLINE_STRING_FLAG: u32 = 0x8000_0000;

/// Bounded little-endian cursor over an immutable byte slice.
///
/// Every read checks bounds before advancing, so a failed read leaves the
/// position where it was.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Borrow the whole underlying buffer.
	pub fn as_slice(&self) -> &'a [u8] {
		self.bytes
	}

	/// Return total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return true when the underlying buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Move to an absolute offset (`offset == len` is allowed).
	pub fn seek(&mut self, offset: u64) -> Result<()> {
		let target = usize::try_from(offset).ok().filter(|target| *target <= self.bytes.len());
		let Some(target) = target else {
			return Err(ResError::OffsetOutOfRange {
				offset,
				len: self.bytes.len(),
			});
		};
		self.pos = target;
		Ok(())
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		let bytes = self.peek(n)?;
		self.pos += n;
		Ok(bytes)
	}

	fn peek(&self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(ResError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}
		Ok(&self.bytes[self.pos..self.pos + n])
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a four-byte code.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		self.read_array()
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian two's complement `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64_le(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian two's complement `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian IEEE-754 single.
	pub fn read_f32_le(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian IEEE-754 double.
	pub fn read_f64_le(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}

	/// Read a `u32` length-prefixed UTF-8 string, stripping one trailing NUL.
	///
	/// Lengths above `max_len` fail with [`ResError::StringTooLong`] without
	/// consuming the length field.
	pub fn read_string(&mut self, max_len: usize) -> Result<String> {
		let at = self.pos;
		let len = u32::from_le_bytes(self.peek_array::<4>()?) as usize;
		if len > max_len {
			return Err(ResError::StringTooLong { at, len, max: max_len });
		}
		let total = 4 + len;
		let raw = self.peek(total)?;
		let text = decode_utf8(&raw[4..], at + 4)?;
		self.pos += total;
		Ok(text)
	}

	/// Read `len` raw UTF-8 bytes (no length prefix), stripping one trailing NUL.
	pub fn read_raw_string(&mut self, len: usize, max_len: usize) -> Result<String> {
		let at = self.pos;
		if len > max_len {
			return Err(ResError::StringTooLong { at, len, max: max_len });
		}
		let raw = self.peek(len)?;
		let text = decode_utf8(raw, at)?;
		self.pos += len;
		Ok(text)
	}

	fn peek_array<const N: usize>(&self) -> Result<[u8; N]> {
		let raw = self.peek(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}
}

fn decode_utf8(raw: &[u8], at: usize) -> Result<String> {
	let raw = raw.strip_suffix(&[0]).unwrap_or(raw);
	std::str::from_utf8(raw).map(str::to_owned).map_err(|_| ResError::InvalidUtf8 { at })
}

/// Growable little-endian byte writer.
#[derive(Debug, Default)]
pub struct Writer {
	bytes: Vec<u8>,
}

impl Writer {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of bytes written so far.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return true when nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Borrow the written bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Consume the writer and return its buffer.
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}

	/// Append raw bytes.
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.bytes.extend_from_slice(bytes);
	}

	/// Append a little-endian `u16`.
	pub fn write_u16_le(&mut self, value: u16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `u32`.
	pub fn write_u32_le(&mut self, value: u32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append an `i32`, clamping out-of-range input instead of wrapping.
	pub fn write_i32_clamped(&mut self, value: i64) {
		let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
		self.write_bytes(&clamped.to_le_bytes());
	}

	/// Append a little-endian `u64`.
	pub fn write_u64_le(&mut self, value: u64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append an `i64`, clamping out-of-range input before taking its two's complement form.
	pub fn write_i64_clamped(&mut self, value: i128) {
		let clamped = value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
		self.write_u64_le(clamped as u64);
	}

	/// Append a little-endian IEEE-754 single.
	pub fn write_f32_le(&mut self, value: f32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian IEEE-754 double.
	pub fn write_f64_le(&mut self, value: f64) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Append a NUL-terminated string with its `u32` byte length.
	///
	/// With `inline_flag` the length carries [`INLINE_STRING_FLAG`]. Lengths the
	/// decoder would refuse (above [`MAX_STRING_LEN`], NUL included) fail with
	/// [`ResError::StringTooLong`] and write nothing.
	pub fn write_string(&mut self, text: &str, inline_flag: bool) -> Result<()> {
		let len = self.checked_len(text.len() + 1)?;
		self.write_u32_le(if inline_flag { len | INLINE_STRING_FLAG } else { len });
		self.write_bytes(text.as_bytes());
		self.bytes.push(0);
		Ok(())
	}

	/// Append a `u32` byte length followed by the raw bytes of `text`, no NUL.
	pub fn write_raw_string(&mut self, text: &str) -> Result<()> {
		let len = self.checked_len(text.len())?;
		self.write_u32_le(len);
		self.write_bytes(text.as_bytes());
		Ok(())
	}

	fn checked_len(&self, len: usize) -> Result<u32> {
		if len > MAX_STRING_LEN {
			return Err(ResError::StringTooLong {
				at: self.bytes.len(),
				len,
				max: MAX_STRING_LEN,
			});
		}
		Ok(len as u32)
	}

	/// Overwrite a previously written `u64` at byte offset `at`.
	pub fn patch_u64_le(&mut self, at: usize, value: u64) {
		self.bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
	}
}
