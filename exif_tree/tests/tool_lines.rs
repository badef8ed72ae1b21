use exif_tree::{
    builder::IfdBuilder,
    encode::encode_to_exif,
    enumerate::ScanOptions,
    flat::get_flat_exif_data,
    undefined::UndefinedValue,
};
use exif_tree_types::exif::{
    Endianness,
    ifd::IfdGroup,
    primitives::{PrimitiveTy, Rational},
};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

fn camera_blob() -> Vec<u8> {
    let mut root = IfdBuilder::new_root(Endianness::Little);
    root.add_standard_with_name("Make", "Canon").unwrap();
    root.add_standard_with_name("Model", "Canon EOS 5D Mark III").unwrap();
    root.add_standard_with_name("Orientation", vec![1_u16]).unwrap();
    root.add_standard_with_name("XResolution", vec![Rational::new(72, 1)])
        .unwrap();

    let mut exif = root.new_child(IfdGroup::Exif).unwrap();
    exif.add_standard_with_name("FNumber", vec![Rational::new(4, 1)])
        .unwrap();
    exif.add_standard_with_name("ExifVersion", UndefinedValue::Text("0230".into()))
        .unwrap();
    root.add_child(exif).unwrap();

    let mut gps = root.new_child(IfdGroup::Gps).unwrap();
    gps.add_standard_with_name("GPSVersionID", vec![2_u8, 3, 0, 0]).unwrap();
    root.add_child(gps).unwrap();

    let mut ifd1 = IfdBuilder::new_root(Endianness::Little);
    ifd1.set_thumbnail(vec![0xff, 0xd8, 0xff, 0xd9]).unwrap();
    root.set_next(ifd1).unwrap();

    encode_to_exif(&root).unwrap()
}

#[test]
fn lines_match_dump_tools() {
    logger();
    let blob = camera_blob();
    let (tags, _) = get_flat_exif_data(&blob, &ScanOptions::default()).unwrap();
    let lines: Vec<String> = tags.iter().map(|t| t.to_tool_line()).collect();

    for expected in [
        "IFD-PATH=[IFD] ID=(0x010f) NAME=[Make] COUNT=(6) TYPE=[ASCII] VALUE=[Canon]",
        "IFD-PATH=[IFD] ID=(0x0110) NAME=[Model] COUNT=(22) TYPE=[ASCII] VALUE=[Canon EOS 5D Mark III]",
        "IFD-PATH=[IFD] ID=(0x0112) NAME=[Orientation] COUNT=(1) TYPE=[SHORT] VALUE=[[1]]",
        "IFD-PATH=[IFD] ID=(0x011a) NAME=[XResolution] COUNT=(1) TYPE=[RATIONAL] VALUE=[[72/1]]",
        "IFD-PATH=[IFD/Exif] ID=(0x829d) NAME=[FNumber] COUNT=(1) TYPE=[RATIONAL] VALUE=[[4/1]]",
        "IFD-PATH=[IFD/Exif] ID=(0x9000) NAME=[ExifVersion] COUNT=(4) TYPE=[UNDEFINED] VALUE=[0230]",
        "IFD-PATH=[IFD/GPSInfo] ID=(0x0000) NAME=[GPSVersionID] COUNT=(4) TYPE=[BYTE] VALUE=[02 03 00 00]",
        "IFD-PATH=[IFD1] ID=(0x0202) NAME=[JPEGInterchangeFormatLength] COUNT=(1) TYPE=[LONG] VALUE=[[4]]",
    ] {
        assert!(lines.iter().any(|l| l == expected), "missing line: {expected}\n{lines:#?}");
    }

    let thumbnail = lines
        .iter()
        .find(|l| l.contains("ID=(0x0201)"))
        .unwrap();
    assert!(thumbnail.starts_with(
        "IFD-PATH=[IFD1] ID=(0x0201) NAME=[JPEGInterchangeFormat] COUNT=(1) TYPE=[LONG] VALUE=[["
    ));
}

#[test]
fn unknown_and_misplaced_tags() {
    logger();
    let mut root = IfdBuilder::new_root(Endianness::Big);
    root.add_standard_with_name("Make", "Canon").unwrap();
    root.add_raw(0xbeef, PrimitiveTy::Short, 1, vec![0x00, 0x07])
        .unwrap();
    // `FNumber` belongs in the Exif IFD
    root.add_raw(0x829d, PrimitiveTy::Rational, 1, [0, 0, 0, 8, 0, 0, 0, 1].to_vec())
        .unwrap();
    let blob = encode_to_exif(&root).unwrap();

    let (tags, misc) = get_flat_exif_data(&blob, &ScanOptions::default()).unwrap();
    assert_eq!(
        tags[1].to_tool_line(),
        "IFD-PATH=[IFD] ID=(0xbeef) NAME=[] COUNT=(1) TYPE=[SHORT] VALUE=[[7]]"
    );
    assert_eq!(tags[2].name, "");
    assert_eq!(misc.unknown_tags.len(), 2);

    let options = ScanOptions::default().with_universal_search(true);
    let (tags, misc) = get_flat_exif_data(&blob, &options).unwrap();
    assert_eq!(tags[2].name, "FNumber");
    assert_eq!(tags[2].formatted, "[8/1]");
    assert_eq!(misc.unknown_tags.values().filter(|t| t.is_some()).count(), 1);
}
