use exif_tree::{enumerate::parse_exif, flat::get_flat_exif_data};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// A big-endian header pointing at an IFD at offset 8.
fn header() -> Vec<u8> {
    let mut blob = b"MM\0*".to_vec();
    blob.extend_from_slice(8_u32.to_be_bytes().as_slice());
    blob
}

fn entry(blob: &mut Vec<u8>, tag_id: u16, ty: u16, count: u32, value: u32) {
    blob.extend_from_slice(tag_id.to_be_bytes().as_slice());
    blob.extend_from_slice(ty.to_be_bytes().as_slice());
    blob.extend_from_slice(count.to_be_bytes().as_slice());
    blob.extend_from_slice(value.to_be_bytes().as_slice());
}

#[test]
fn sibling_pointing_at_itself() {
    logger();
    let mut blob = header();
    blob.extend_from_slice(1_u16.to_be_bytes().as_slice());
    entry(&mut blob, 0x0100, 4, 1, 640);
    // next IFD is... this one
    blob.extend_from_slice(8_u32.to_be_bytes().as_slice());

    let exif = parse_exif(&blob).unwrap();
    assert!(exif.root.next_ifd().is_none());
    assert_eq!(exif.root.next_ifd_offset(), 8);
    assert_eq!(exif.ifds().len(), 1);
}

#[test]
fn child_pointing_at_its_parent() {
    logger();
    let mut blob = header();
    blob.extend_from_slice(2_u16.to_be_bytes().as_slice());
    entry(&mut blob, 0x0100, 4, 1, 640);
    // `ExifTag`, pointing back at IFD 0
    entry(&mut blob, 0x8769, 4, 1, 8);
    blob.extend_from_slice(0_u32.to_be_bytes().as_slice());

    let exif = parse_exif(&blob).unwrap();
    assert_eq!(exif.root.entries().len(), 2);
    assert_eq!(exif.root.children().count(), 0);

    let (tags, _) = get_flat_exif_data(&blob, &Default::default()).unwrap();
    assert_eq!(tags.len(), 2);
}

#[test]
fn two_siblings_pointing_at_each_other() {
    logger();
    let mut blob = header();

    // IFD at 8, then IFD1 at 26, which points back at 8
    blob.extend_from_slice(1_u16.to_be_bytes().as_slice());
    entry(&mut blob, 0x0100, 4, 1, 640);
    blob.extend_from_slice(26_u32.to_be_bytes().as_slice());

    blob.extend_from_slice(1_u16.to_be_bytes().as_slice());
    entry(&mut blob, 0x0101, 4, 1, 480);
    blob.extend_from_slice(8_u32.to_be_bytes().as_slice());

    let exif = parse_exif(&blob).unwrap();
    let ifd1 = exif.root.next_ifd().unwrap();
    assert_eq!(ifd1.identity().fully_qualified_path(), "IFD1");
    assert!(ifd1.next_ifd().is_none());
    assert_eq!(exif.ifds().len(), 2);
}
