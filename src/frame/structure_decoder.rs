use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::{WireStructure, FRAME_HEADER_BYTES};

/// Decodes the fixed-size structures of the wire format, buffering bytes
/// only when a structure is split across decode buffers. The scratch area
/// is sized for the largest structure, the frame header.
///
/// The expected case by far is that the whole structure is present, in
/// which case `start` decodes straight out of the caller's buffer and the
/// scratch area is never touched.
#[derive(Debug)]
pub struct StructureDecoder {
    buffer: [u8; FRAME_HEADER_BYTES],
    offset: u32,
}

impl Default for StructureDecoder {
    fn default() -> Self {
        StructureDecoder {
            buffer: [0; FRAME_HEADER_BYTES],
            offset: 0,
        }
    }
}

impl StructureDecoder {
    /// Returns true if the structure was wholly available and is now in
    /// `out`; false if the available bytes were copied into scratch, in
    /// which case the caller must call `resume` with more input later.
    pub fn start<S: WireStructure>(&mut self, out: &mut S, buf: &mut DecodeBuffer<'_>) -> bool {
        debug_assert!(S::WIRE_SIZE <= FRAME_HEADER_BYTES);
        if buf.remaining() >= S::WIRE_SIZE {
            *out = S::decode(buf);
            return true;
        }
        self.incomplete_start(buf, S::WIRE_SIZE as u32);
        false
    }

    pub fn resume<S: WireStructure>(&mut self, out: &mut S, buf: &mut DecodeBuffer<'_>) -> bool {
        if self.resume_filling_buffer(buf, S::WIRE_SIZE as u32) {
            let mut scratch = DecodeBuffer::new(&self.buffer[..S::WIRE_SIZE]);
            *out = S::decode(&mut scratch);
            return true;
        }
        debug_assert!(self.offset < S::WIRE_SIZE as u32);
        false
    }

    /// Variant coupled to the caller's `remaining_payload` counter, which
    /// is decremented in lock-step with consumption. The buffer may extend
    /// beyond the remaining payload (e.g. into trailing padding), and the
    /// payload may run out before the structure completes, which is a frame
    /// size error distinct from simply needing more input.
    pub fn start_in_payload<S: WireStructure>(
        &mut self,
        out: &mut S,
        buf: &mut DecodeBuffer<'_>,
        remaining_payload: &mut u32,
    ) -> DecodeStatus {
        debug_assert!(S::WIRE_SIZE <= FRAME_HEADER_BYTES);
        if buf.min_length_remaining(*remaining_payload as usize) >= S::WIRE_SIZE {
            *out = S::decode(buf);
            *remaining_payload -= S::WIRE_SIZE as u32;
            return DecodeStatus::Done;
        }
        self.incomplete_start_in_payload(buf, remaining_payload, S::WIRE_SIZE as u32)
    }

    pub fn resume_in_payload<S: WireStructure>(
        &mut self,
        out: &mut S,
        buf: &mut DecodeBuffer<'_>,
        remaining_payload: &mut u32,
    ) -> bool {
        if self.resume_filling_buffer_in_payload(buf, remaining_payload, S::WIRE_SIZE as u32) {
            let mut scratch = DecodeBuffer::new(&self.buffer[..S::WIRE_SIZE]);
            *out = S::decode(&mut scratch);
            return true;
        }
        debug_assert!(self.offset < S::WIRE_SIZE as u32);
        false
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    fn incomplete_start(&mut self, buf: &mut DecodeBuffer<'_>, target_size: u32) -> u32 {
        let num_to_copy = buf.min_length_remaining(target_size as usize);
        self.buffer[..num_to_copy].copy_from_slice(&buf.chunk()[..num_to_copy]);
        self.offset = num_to_copy as u32;
        buf.advance(num_to_copy);
        num_to_copy as u32
    }

    fn incomplete_start_in_payload(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        remaining_payload: &mut u32,
        target_size: u32,
    ) -> DecodeStatus {
        *remaining_payload -= self.incomplete_start(buf, target_size.min(*remaining_payload));
        if *remaining_payload > 0 && buf.is_empty() {
            return DecodeStatus::InProgress;
        }
        // The payload ran out before the structure could complete.
        DecodeStatus::Error
    }

    fn resume_filling_buffer(&mut self, buf: &mut DecodeBuffer<'_>, target_size: u32) -> bool {
        debug_assert!(self.offset <= target_size);
        let needed = target_size - self.offset;
        let num_to_copy = buf.min_length_remaining(needed as usize) as u32;
        let start = self.offset as usize;
        self.buffer[start..start + num_to_copy as usize]
            .copy_from_slice(&buf.chunk()[..num_to_copy as usize]);
        buf.advance(num_to_copy as usize);
        self.offset += num_to_copy;
        needed == num_to_copy
    }

    fn resume_filling_buffer_in_payload(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        remaining_payload: &mut u32,
        target_size: u32,
    ) -> bool {
        debug_assert!(self.offset <= target_size);
        let needed = target_size - self.offset;
        let num_to_copy = buf.min_length_remaining(needed.min(*remaining_payload) as usize) as u32;
        let start = self.offset as usize;
        self.buffer[start..start + num_to_copy as usize]
            .copy_from_slice(&buf.chunk()[..num_to_copy as usize]);
        buf.advance(num_to_copy as usize);
        self.offset += num_to_copy;
        *remaining_payload -= num_to_copy;
        needed == num_to_copy
    }
}
