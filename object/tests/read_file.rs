//! Whole-file reading tests over hand-crafted DICOM byte streams.

use dcmflow_core::{Tag, VR};
use dcmflow_object::frame::{FrameData, FrameSink};
use dcmflow_object::{from_reader, from_reader_with_options, ParseOptions, ParseWarning};
use std::io::Write;

const TAG_PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
const TAG_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

fn push_tag(out: &mut Vec<u8>, group: u16, elem: u16) {
    out.extend(group.to_le_bytes());
    out.extend(elem.to_le_bytes());
}

/// Explicit VR element with a 16-bit length field.
fn elem_short(out: &mut Vec<u8>, group: u16, elem: u16, vr: &str, value: &[u8]) {
    push_tag(out, group, elem);
    out.extend(vr.as_bytes());
    out.extend((value.len() as u16).to_le_bytes());
    out.extend(value);
}

/// Explicit VR element with reserved bytes and a 32-bit length field.
fn elem_long(out: &mut Vec<u8>, group: u16, elem: u16, vr: &str, len: u32, value: &[u8]) {
    push_tag(out, group, elem);
    out.extend(vr.as_bytes());
    out.extend([0u8, 0u8]);
    out.extend(len.to_le_bytes());
    out.extend(value);
}

/// Implicit VR element.
fn elem_implicit(out: &mut Vec<u8>, group: u16, elem: u16, value: &[u8]) {
    push_tag(out, group, elem);
    out.extend((value.len() as u32).to_le_bytes());
    out.extend(value);
}

fn item_header(out: &mut Vec<u8>, len: u32) {
    push_tag(out, 0xFFFE, 0xE000);
    out.extend(len.to_le_bytes());
}

fn sequence_delimiter(out: &mut Vec<u8>) {
    push_tag(out, 0xFFFE, 0xE0DD);
    out.extend(0u32.to_le_bytes());
}

/// Preamble, magic code and a meta group declaring the given transfer
/// syntax.
fn file_head(transfer_syntax: &str) -> Vec<u8> {
    let mut uid = transfer_syntax.as_bytes().to_vec();
    if uid.len() % 2 != 0 {
        uid.push(0);
    }

    let mut meta = Vec::new();
    elem_short(&mut meta, 0x0002, 0x0010, "UI", &uid);

    let mut out = vec![0u8; 128];
    out.write_all(b"DICM").unwrap();
    elem_short(&mut out, 0x0002, 0x0000, "UL", &(meta.len() as u32).to_le_bytes());
    out.extend(meta);
    out
}

/// Geometry attributes for a 2×2, 8-bit, single-sample image,
/// in explicit VR little endian.
fn geometry_elements(out: &mut Vec<u8>) {
    elem_short(out, 0x0028, 0x0002, "US", &1u16.to_le_bytes());
    elem_short(out, 0x0028, 0x0010, "US", &2u16.to_le_bytes());
    elem_short(out, 0x0028, 0x0011, "US", &2u16.to_le_bytes());
    elem_short(out, 0x0028, 0x0100, "US", &8u16.to_le_bytes());
}

#[test]
fn minimal_explicit_le_file() {
    let mut data = file_head("1.2.840.10008.1.2.1");
    elem_short(&mut data, 0x0010, 0x0010, "PN", b"DOE^");

    let obj = from_reader(&data[..]).expect("file should parse");

    // group length + transfer syntax + patient name
    assert_eq!(obj.dataset().len(), 3);
    assert!(obj.warnings().is_empty());

    let meta = obj.meta().expect("file has a meta group");
    assert_eq!(meta.transfer_syntax_uid(), Some("1.2.840.10008.1.2.1"));

    let patient_name = obj.element(TAG_PATIENT_NAME).expect("has PatientName");
    assert_eq!(patient_name.vr(), VR::PN);
    // the value holds one person name; the caret separates its
    // name components (family "DOE", given name empty), which are
    // left for the consumer to split
    assert_eq!(patient_name.strings().unwrap(), ["DOE^".to_string()]);
    assert_eq!(
        patient_name
            .string()
            .unwrap()
            .split('^')
            .collect::<Vec<_>>(),
        ["DOE", ""]
    );
}

#[test]
fn implicit_vr_body_resolves_vr_through_dictionary() {
    let mut data = file_head("1.2.840.10008.1.2");
    elem_implicit(&mut data, 0x0008, 0x0018, b"1.2.3\0");

    let obj = from_reader(&data[..]).expect("file should parse");
    assert!(obj.warnings().is_empty());

    let elem = obj.element(Tag(0x0008, 0x0018)).expect("has SOPInstanceUID");
    assert_eq!(elem.vr(), VR::UI);
    assert_eq!(elem.to_str().unwrap(), "1.2.3");
}

#[test]
fn undefined_length_sequence_with_one_item() {
    let mut data = file_head("1.2.840.10008.1.2.1");

    // (0040,0275) RequestAttributesSequence, undefined length
    let mut item = Vec::new();
    elem_short(&mut item, 0x0040, 0x0009, "SH", b"SPD1");
    elem_short(&mut item, 0x0040, 0x1001, "SH", b"RP01");

    elem_long(&mut data, 0x0040, 0x0275, "SQ", 0xFFFF_FFFF, &[]);
    item_header(&mut data, item.len() as u32);
    data.extend(&item);
    sequence_delimiter(&mut data);

    let obj = from_reader(&data[..]).expect("file should parse");

    let seq = obj.element(Tag(0x0040, 0x0275)).expect("has the sequence");
    assert_eq!(seq.vr(), VR::SQ);
    let items = seq.value().items().expect("value is a sequence");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].len(), 2);
    assert_eq!(
        items[0]
            .element(Tag(0x0040, 0x1001))
            .expect("item has RequestedProcedureID")
            .to_str()
            .unwrap(),
        "RP01"
    );
}

#[test]
fn native_pixel_data_two_frames() {
    let mut data = file_head("1.2.840.10008.1.2.1");
    geometry_elements(&mut data);
    elem_short(&mut data, 0x0028, 0x0008, "IS", b"2 ");
    elem_long(
        &mut data,
        0x7FE0,
        0x0010,
        "OB",
        8,
        &[1, 2, 3, 4, 5, 6, 7, 8],
    );

    let (sink, frames) = FrameSink::channel(4);
    let obj = from_reader_with_options(
        &data[..],
        ParseOptions {
            frame_sink: Some(sink),
            ..Default::default()
        },
    )
    .expect("file should parse");
    assert!(obj.warnings().is_empty());

    // the pixel data element retains the full buffer
    let pixel_data = obj.element(TAG_PIXEL_DATA).expect("has PixelData");
    assert_eq!(
        pixel_data.value().uint8_slice().unwrap(),
        &[1, 2, 3, 4, 5, 6, 7, 8]
    );

    let frames: Vec<_> = frames.iter().collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].index, 0);
    assert_eq!(frames[0].geometry.rows, 2);
    assert_eq!(frames[0].geometry.columns, 2);
    assert_eq!(frames[0].data, FrameData::Native(vec![1, 2, 3, 4]));
    assert_eq!(frames[1].index, 1);
    assert_eq!(frames[1].data, FrameData::Native(vec![5, 6, 7, 8]));
}

#[test]
fn native_pixel_data_without_geometry_is_a_warning() {
    let mut data = file_head("1.2.840.10008.1.2.1");
    // no geometry elements at all
    elem_long(&mut data, 0x7FE0, 0x0010, "OB", 4, &[9, 9, 9, 9]);

    let (sink, frames) = FrameSink::channel(4);
    let obj = from_reader_with_options(
        &data[..],
        ParseOptions {
            frame_sink: Some(sink),
            ..Default::default()
        },
    )
    .expect("file should still parse");

    // the bytes were consumed and stored, but no frames were emitted
    assert!(obj.element(TAG_PIXEL_DATA).is_some());
    assert_eq!(frames.iter().count(), 0);
    assert!(matches!(
        obj.warnings(),
        [ParseWarning::MissingGeometry { .. }]
    ));
}

#[test]
fn encapsulated_pixel_data_two_fragments() {
    let mut data = file_head("1.2.840.10008.1.2.4.50");
    geometry_elements(&mut data);

    // PixelData with undefined length: empty offset table,
    // then one fragment per frame
    elem_long(&mut data, 0x7FE0, 0x0010, "OB", 0xFFFF_FFFF, &[]);
    item_header(&mut data, 0);
    item_header(&mut data, 10);
    data.extend([0xAA; 10]);
    item_header(&mut data, 10);
    data.extend([0xBB; 10]);
    sequence_delimiter(&mut data);

    let (sink, frames) = FrameSink::channel(4);
    let obj = from_reader_with_options(
        &data[..],
        ParseOptions {
            frame_sink: Some(sink),
            ..Default::default()
        },
    )
    .expect("file should parse");
    assert!(obj.warnings().is_empty());

    // the element holds the original compressed fragments
    let pixel_data = obj.element(TAG_PIXEL_DATA).expect("has PixelData");
    let fragments = pixel_data.value().fragments().expect("encapsulated value");
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0], vec![0xAA; 10]);

    let frames: Vec<_> = frames.iter().collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].data, FrameData::Encapsulated(vec![vec![0xAA; 10]]));
    assert_eq!(frames[1].data, FrameData::Encapsulated(vec![vec![0xBB; 10]]));
}

#[test]
fn bad_magic_word_is_fatal() {
    let mut data = vec![0u8; 128];
    data.extend(b"DICX");
    data.extend([0u8; 16]);

    let res = from_reader(&data[..]);
    assert!(res.is_err());
}

#[test]
fn unknown_transfer_syntax_falls_back_to_implicit_le() {
    let mut data = file_head("1.2.999.12345");
    // body in implicit VR little endian
    elem_implicit(&mut data, 0x0008, 0x0060, b"CT");

    let obj = from_reader(&data[..]).expect("file should parse with a fallback");
    assert!(matches!(
        obj.warnings(),
        [ParseWarning::UnknownTransferSyntax { uid }] if uid == "1.2.999.12345"
    ));
    assert_eq!(
        obj.element(Tag(0x0008, 0x0060)).unwrap().to_str().unwrap(),
        "CT"
    );
}

#[test]
fn deflated_transfer_syntax_is_unsupported() {
    let mut data = file_head("1.2.840.10008.1.2.1.99");
    data.extend([0u8; 4]);

    let res = from_reader(&data[..]);
    assert!(matches!(
        res,
        Err(dcmflow_object::ReadError::UnsupportedTransferSyntax { .. })
    ));
}

/// Reading a bare data set with `assume_no_header_and_offset` yields the
/// same top-level elements as reading a file which wraps the same bytes
/// in a preamble and meta group.
#[test]
fn no_header_mode_is_equivalent_to_wrapped_data() {
    let mut body = Vec::new();
    elem_implicit(&mut body, 0x0008, 0x0060, b"CT");
    elem_implicit(&mut body, 0x0010, 0x0010, b"DOE^");

    let bare = from_reader_with_options(
        &body[..],
        ParseOptions {
            assume_no_header_and_offset: true,
            ..Default::default()
        },
    )
    .expect("bare data set should parse");
    assert!(bare.meta().is_none());

    let mut wrapped = file_head("1.2.840.10008.1.2");
    wrapped.extend(&body);
    let wrapped = from_reader(&wrapped[..]).expect("wrapped data set should parse");

    // skip the meta block of the wrapped version (2 elements)
    let bare_elems: Vec<_> = bare.dataset().iter().collect();
    let wrapped_elems: Vec<_> = wrapped.dataset().iter().skip(2).collect();
    assert_eq!(bare_elems, wrapped_elems);
}

/// Frames can be consumed from another thread while the file is being
/// read, with backpressure through the bounded channel.
#[test]
fn frames_stream_across_threads() {
    let mut data = file_head("1.2.840.10008.1.2.1");
    geometry_elements(&mut data);
    elem_short(&mut data, 0x0028, 0x0008, "IS", b"4 ");
    let pixels: Vec<u8> = (0u8..16).collect();
    elem_long(&mut data, 0x7FE0, 0x0010, "OB", 16, &pixels);

    // a capacity of 1 forces the reader to wait for the consumer
    let (sink, frames) = FrameSink::channel(1);

    let consumer = std::thread::spawn(move || frames.iter().collect::<Vec<_>>());

    let obj = from_reader_with_options(
        &data[..],
        ParseOptions {
            frame_sink: Some(sink),
            ..Default::default()
        },
    )
    .expect("file should parse");
    assert!(obj.warnings().is_empty());

    let frames = consumer.join().expect("consumer should finish");
    assert_eq!(frames.len(), 4);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.index, i as u32);
        assert_eq!(
            frame.data,
            FrameData::Native(pixels[i * 4..(i + 1) * 4].to_vec())
        );
    }
}

/// A dropped receiver makes the read fail,
/// since the emit obligation cannot be met.
#[test]
fn disconnected_frame_receiver_fails_the_read() {
    let mut data = file_head("1.2.840.10008.1.2.1");
    geometry_elements(&mut data);
    elem_long(&mut data, 0x7FE0, 0x0010, "OB", 4, &[1, 2, 3, 4]);

    let (sink, frames) = FrameSink::channel(1);
    drop(frames);

    let res = from_reader_with_options(
        &data[..],
        ParseOptions {
            frame_sink: Some(sink),
            ..Default::default()
        },
    );
    assert!(matches!(
        res,
        Err(dcmflow_object::ReadError::SendFrame { .. })
    ));
}
