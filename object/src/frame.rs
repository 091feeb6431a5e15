//! Image frame types and the frame channel.
//!
//! Frames are produced while the data set is being read: native pixel
//! data is sliced according to the image geometry, and encapsulated
//! pixel data is grouped into frames of one or more fragments according
//! to the basic offset table. A consumer receives them through a
//! bounded hand-off channel, typically from another thread; sends block
//! while the channel is full, applying backpressure onto the reading
//! process.
//!
//! The sending half is closed by dropping it, which the reading process
//! does exactly once on every exit path, normal and erroneous.

use crate::{ParseWarning, ReadError, Result, SendFrameSnafu};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

/// The image geometry attributes governing frame extraction,
/// captured from the data set at the moment the pixel data is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGeometry {
    /// Rows (0028,0010)
    pub rows: u16,
    /// Columns (0028,0011)
    pub columns: u16,
    /// Samples per Pixel (0028,0002)
    pub samples_per_pixel: u16,
    /// Bits Allocated (0028,0100)
    pub bits_allocated: u16,
    /// High Bit (0028,0102), if present
    pub high_bit: Option<u16>,
    /// Photometric Interpretation (0028,0004), if present
    pub photometric_interpretation: Option<String>,
}

impl ImageGeometry {
    /// The number of bytes a single native frame occupies.
    pub fn frame_byte_size(&self) -> u64 {
        let bits = u64::from(self.rows)
            * u64::from(self.columns)
            * u64::from(self.samples_per_pixel)
            * u64::from(self.bits_allocated);
        (bits + 7) / 8
    }
}

/// The pixel content of a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    /// Uncompressed pixel bytes, as found in a native pixel data
    /// element.
    Native(Vec<u8>),
    /// The compressed bitstream of one frame, as the unaltered
    /// fragments of an encapsulated pixel data element.
    Encapsulated(Vec<Vec<u8>>),
}

/// A decoded image frame, delivered in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Zero-based index of the frame within the pixel data.
    pub index: u32,
    /// The geometry attributes in effect when the frame was read.
    pub geometry: ImageGeometry,
    /// The frame content.
    pub data: FrameData,
}

/// The sending half of the frame channel.
///
/// Created together with its receiver via [`FrameSink::channel`] and
/// handed to the reading process through the parse options. Dropping the
/// sink closes the channel.
#[derive(Debug)]
pub struct FrameSink {
    tx: SyncSender<Frame>,
}

impl FrameSink {
    /// Create a bounded frame channel with the given capacity.
    ///
    /// The returned receiver yields frames in file order;
    /// it stops yielding once the reading process has finished
    /// (successfully or not) and the sink has been dropped.
    pub fn channel(capacity: usize) -> (FrameSink, Receiver<Frame>) {
        let (tx, rx) = sync_channel(capacity);
        (FrameSink { tx }, rx)
    }

    /// Deliver a frame to the consumer, blocking while the channel is
    /// full. A disconnected receiver is a read error: the emit
    /// obligation can no longer be met.
    pub(crate) fn send(&self, frame: Frame) -> Result<()> {
        let index = frame.index;
        self.tx
            .send(frame)
            .map_err(|_| SendFrameSnafu { index }.build())
    }
}

/// Slice a native pixel data buffer into frames and deliver them on the
/// sink. Returns a warning when the buffer does not divide evenly.
pub(crate) fn emit_native_frames(
    geometry: &ImageGeometry,
    data: &[u8],
    number_of_frames: u32,
    sink: &FrameSink,
) -> Result<Option<ParseWarning>, ReadError> {
    let frame_size = geometry.frame_byte_size() as usize;
    if frame_size == 0 {
        return Ok(None);
    }

    let full_frames = (data.len() / frame_size).min(number_of_frames as usize);
    for (i, chunk) in data.chunks_exact(frame_size).take(full_frames).enumerate() {
        sink.send(Frame {
            index: i as u32,
            geometry: geometry.clone(),
            data: FrameData::Native(chunk.to_vec()),
        })?;
    }

    let residue = data.len() as u64 - (full_frames as u64 * frame_size as u64);
    if residue > 0 {
        tracing::warn!("{} residual bytes of pixel data were not framed", residue);
        return Ok(Some(ParseWarning::PixelDataResidue { bytes: residue }));
    }
    Ok(None)
}

/// Incremental grouping of encapsulated pixel data fragments into
/// frames, following the basic offset table.
///
/// Fragments are appended as they are read from the stream; a frame is
/// delivered as soon as the next declared boundary is reached. With an
/// empty offset table, every fragment is assumed to be one frame.
#[derive(Debug)]
pub(crate) struct FrameAssembler {
    geometry: Option<ImageGeometry>,
    /// frame start offsets into the concatenated fragment stream
    offsets: Vec<u32>,
    /// index into `offsets` of the next frame boundary to look for
    next_boundary: usize,
    /// bytes of fragment data accumulated so far
    cumulative: u64,
    current: Vec<Vec<u8>>,
    index: u32,
}

impl FrameAssembler {
    /// Create an assembler. Without geometry, fragments are still
    /// accepted but no frames are delivered.
    pub fn new(geometry: Option<ImageGeometry>) -> Self {
        FrameAssembler {
            geometry,
            offsets: Vec::new(),
            next_boundary: 1,
            cumulative: 0,
            current: Vec::new(),
            index: 0,
        }
    }

    /// Install the basic offset table, read from the first item.
    pub fn set_offset_table(&mut self, offsets: Vec<u32>) {
        self.offsets = offsets;
        self.next_boundary = 1;
    }

    /// Account for the next fragment, delivering a finished frame on the
    /// sink when a declared boundary is crossed.
    pub fn push_fragment(&mut self, fragment: &[u8], sink: Option<&FrameSink>) -> Result<()> {
        if !self.offsets.is_empty() {
            if let Some(&boundary) = self.offsets.get(self.next_boundary) {
                if self.cumulative >= u64::from(boundary) && !self.current.is_empty() {
                    self.next_boundary += 1;
                    self.flush(sink)?;
                }
            }
        }

        self.cumulative += fragment.len() as u64;
        self.current.push(fragment.to_vec());

        if self.offsets.is_empty() {
            // no offset table: one fragment per frame
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Deliver the last pending frame, if any.
    pub fn finish(&mut self, sink: Option<&FrameSink>) -> Result<()> {
        if !self.current.is_empty() {
            self.flush(sink)?;
        }
        Ok(())
    }

    fn flush(&mut self, sink: Option<&FrameSink>) -> Result<()> {
        let fragments = std::mem::take(&mut self.current);
        let index = self.index;
        self.index += 1;
        if let (Some(sink), Some(geometry)) = (sink, &self.geometry) {
            sink.send(Frame {
                index,
                geometry: geometry.clone(),
                data: FrameData::Encapsulated(fragments),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> ImageGeometry {
        ImageGeometry {
            rows: 2,
            columns: 2,
            samples_per_pixel: 1,
            bits_allocated: 8,
            high_bit: Some(7),
            photometric_interpretation: Some("MONOCHROME2".to_string()),
        }
    }

    #[test]
    fn frame_byte_size_rounds_up() {
        let g = geometry();
        assert_eq!(g.frame_byte_size(), 4);

        let g = ImageGeometry {
            rows: 3,
            columns: 3,
            bits_allocated: 1,
            ..geometry()
        };
        // 9 bits occupy 2 bytes
        assert_eq!(g.frame_byte_size(), 2);
    }

    #[test]
    fn native_frames_are_sliced_and_delivered() {
        let (sink, rx) = FrameSink::channel(8);
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let warning = emit_native_frames(&geometry(), &data, 2, &sink).unwrap();
        assert!(warning.is_none());
        drop(sink);

        let frames: Vec<_> = rx.iter().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[0].data, FrameData::Native(vec![1, 2, 3, 4]));
        assert_eq!(frames[1].index, 1);
        assert_eq!(frames[1].data, FrameData::Native(vec![5, 6, 7, 8]));
    }

    #[test]
    fn native_residue_is_reported() {
        let (sink, rx) = FrameSink::channel(8);
        let data = [1u8, 2, 3, 4, 5, 6];
        let warning = emit_native_frames(&geometry(), &data, 1, &sink).unwrap();
        assert_eq!(warning, Some(ParseWarning::PixelDataResidue { bytes: 2 }));
        drop(sink);
        assert_eq!(rx.iter().count(), 1);
    }

    #[test]
    fn assembler_without_offset_table_emits_per_fragment() {
        let (sink, rx) = FrameSink::channel(8);
        let mut assembler = FrameAssembler::new(Some(geometry()));
        assembler.push_fragment(&[0xAA; 10], Some(&sink)).unwrap();
        assembler.push_fragment(&[0xBB; 10], Some(&sink)).unwrap();
        assembler.finish(Some(&sink)).unwrap();
        drop(sink);

        let frames: Vec<_> = rx.iter().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data, FrameData::Encapsulated(vec![vec![0xAA; 10]]));
        assert_eq!(frames[1].data, FrameData::Encapsulated(vec![vec![0xBB; 10]]));
    }

    #[test]
    fn assembler_groups_fragments_by_offset_table() {
        let (sink, rx) = FrameSink::channel(8);
        let mut assembler = FrameAssembler::new(Some(geometry()));
        // frame 0 starts at 0 and spans two fragments;
        // frame 1 starts at byte 20 of the fragment stream
        assembler.set_offset_table(vec![0, 20]);
        assembler.push_fragment(&[0x01; 10], Some(&sink)).unwrap();
        assembler.push_fragment(&[0x02; 10], Some(&sink)).unwrap();
        assembler.push_fragment(&[0x03; 10], Some(&sink)).unwrap();
        assembler.finish(Some(&sink)).unwrap();
        drop(sink);

        let frames: Vec<_> = rx.iter().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[0].data,
            FrameData::Encapsulated(vec![vec![0x01; 10], vec![0x02; 10]])
        );
        assert_eq!(frames[1].data, FrameData::Encapsulated(vec![vec![0x03; 10]]));
    }

    #[test]
    fn send_on_disconnected_receiver_is_an_error() {
        let (sink, rx) = FrameSink::channel(1);
        drop(rx);
        let res = sink.send(Frame {
            index: 0,
            geometry: geometry(),
            data: FrameData::Native(vec![0; 4]),
        });
        assert!(matches!(res, Err(ReadError::SendFrame { index: 0, .. })));
    }
}
