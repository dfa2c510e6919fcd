//! Parser capability shared by every protocol layer

use bytes::Bytes;

/// Decodes one protocol layer from a raw byte span
///
/// `parse` returns `None` when the span is too short for the fixed header,
/// when a version or type discriminator holds an unexpected value, or when
/// the next layer (if any) fails to decode. It never panics on malformed
/// input. Parsers that dispatch to a next layer hold those parsers
/// themselves, injected at construction.
pub trait FrameParser {
    /// Frame produced on success
    type Output;

    /// Decode `raw`, keeping slices of it as the frame's raw bytes
    fn parse(&self, raw: &Bytes) -> Option<Self::Output>;

    /// Decode a borrowed slice, copying it once into an owned buffer
    fn parse_slice(&self, raw: &[u8]) -> Option<Self::Output> {
        self.parse(&Bytes::copy_from_slice(raw))
    }
}
