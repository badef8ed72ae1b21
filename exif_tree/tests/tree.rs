use exif_tree::{
    builder::IfdBuilder,
    encode::encode_to_exif,
    enumerate::parse_exif,
    undefined::{UndefinedValue, UserComment},
    value::Value,
};
use exif_tree_types::exif::{Endianness, ifd::IfdGroup, primitives::Rational};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// `IFD` with two children between its own tags, then `IFD1`.
fn sample_tree(endianness: Endianness) -> IfdBuilder {
    let mut root = IfdBuilder::new_root(endianness);
    root.add_standard(0x000b, "asciivalue").unwrap();
    root.add_standard(0x00ff, vec![0x1122_u16]).unwrap();

    let mut exif = root.new_child(IfdGroup::Exif).unwrap();
    exif.add_standard(0x8827, vec![0x1122_u16]).unwrap();
    exif.add_standard(0x8833, vec![0x33445566_u32]).unwrap();
    root.add_child(exif).unwrap();

    root.add_standard(0x0100, vec![0x33445566_u32]).unwrap();

    // the tables say one unit, but the builder doesn't hold us to it
    let mut gps = root.new_child(IfdGroup::Gps).unwrap();
    gps.add_standard(0x0005, vec![0x11_u8, 0x22]).unwrap();
    root.add_child(gps).unwrap();

    root.add_standard(0x013e, vec![Rational::new(0x11112222, 0x33334444)])
        .unwrap();

    let mut ifd1 = IfdBuilder::new_root(endianness);
    ifd1.add_standard(0x0101, vec![0x1122_u16]).unwrap();
    ifd1.add_standard(0x0102, vec![0x3344_u16]).unwrap();
    root.set_next(ifd1).unwrap();

    root
}

const EXPECTED_TREE: &[&str] = &[
    "> IFD [ROOT]->[IFD]:(0) TOP",
    "  - (0x000b)",
    "  - (0x00ff)",
    "  - (0x8769)",
    "  > IFD [IFD]->[IFD/Exif]:(0) TOP",
    "    - (0x8827)",
    "    - (0x8833)",
    "  < IFD [IFD]->[IFD/Exif]:(0) BOTTOM",
    "  - (0x0100)",
    "  - (0x8825)",
    "  > IFD [IFD]->[IFD/GPSInfo]:(0) TOP",
    "    - (0x0005)",
    "  < IFD [IFD]->[IFD/GPSInfo]:(0) BOTTOM",
    "  - (0x013e)",
    "< IFD [ROOT]->[IFD]:(0) BOTTOM",
    "* LINKING TO SIBLING IFD [IFD]:(1)",
    "> IFD [ROOT]->[IFD]:(1) TOP",
    "  - (0x0101)",
    "  - (0x0102)",
    "< IFD [ROOT]->[IFD]:(1) BOTTOM",
];

#[test]
fn children_and_siblings_survive_encoding() {
    logger();

    for endianness in [Endianness::Big, Endianness::Little] {
        let blob = encode_to_exif(&sample_tree(endianness)).unwrap();
        let exif = parse_exif(&blob).unwrap();

        assert_eq!(exif.header.endianness, endianness);
        assert_eq!(exif.dump_tree(), EXPECTED_TREE);
        assert_eq!(exif.ifds().len(), 4);

        let exif_ifd = exif.lookup("IFD/Exif").unwrap();
        let iso = exif_ifd.find_tag_with_name("ISOSpeed").unwrap();
        assert_eq!(iso[0].value(), Ok(Value::Longs(vec![0x33445566])));

        let ifd1 = exif.lookup("IFD1").unwrap();
        assert_eq!(ifd1.identity().fully_qualified_path(), "IFD1");
        assert_eq!(ifd1.entries().len(), 2);
        assert!(ifd1.next_ifd().is_none());

        let root = &exif.root;
        assert_eq!(
            root.child_with_ifd_path("IFD/GPSInfo").unwrap().entries()[0].value(),
            Ok(Value::Bytes(vec![0x11, 0x22]))
        );
        assert!(root.child_with_ifd_path("IFD/Exif/Iop").is_err());
    }
}

#[test]
fn visiting_matches_the_tree() {
    logger();
    let blob = encode_to_exif(&sample_tree(Endianness::Big)).unwrap();
    let exif = parse_exif(&blob).unwrap();

    let mut visited = Vec::new();
    exif.root
        .enumerate_tags_recursively(&mut |entry| {
            visited.push(entry.tag_id());
            Ok::<(), ()>(())
        })
        .unwrap();

    assert_eq!(
        visited,
        vec![
            0x000b, 0x00ff, 0x8769, 0x8827, 0x8833, 0x0100, 0x8825, 0x0005, 0x013e, 0x0101, 0x0102
        ]
    );

    // errors stop the walk
    let mut seen = 0;
    let stopped = exif.root.enumerate_tags_recursively(&mut |entry| {
        seen += 1;
        match entry.tag_id() {
            0x8827 => Err("stop"),
            _ => Ok(()),
        }
    });
    assert_eq!(stopped, Err("stop"));
    assert_eq!(seen, 4);
}

#[test]
fn unchanged_trees_encode_identically() {
    logger();

    let mut original = sample_tree(Endianness::Little);
    {
        let exif = original.get_or_create_child("IFD/Exif").unwrap();
        exif.add_standard(0x9000, UndefinedValue::Text("0230".into()))
            .unwrap();
        exif.add_standard(0x9286, UndefinedValue::UserComment(UserComment::ascii("a comment")))
            .unwrap();
    }
    original
        .next_mut()
        .unwrap()
        .set_thumbnail(vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0xff, 0xd9])
        .unwrap();

    let blob = encode_to_exif(&original).unwrap();
    let parsed = parse_exif(&blob).unwrap();

    let ifd1 = parsed.lookup("IFD1").unwrap();
    assert_eq!(
        ifd1.thumbnail(),
        Ok([0xff, 0xd8, 0xff, 0xe0, 0x00, 0xff, 0xd9].as_slice())
    );

    let comment = parsed
        .lookup("IFD/Exif")
        .unwrap()
        .find_tag_with_name("UserComment")
        .unwrap();
    assert_eq!(comment[0].format().unwrap(), "[ASCII] a comment");

    let rebuilt = IfdBuilder::from_existing_chain(&parsed.root).unwrap();
    assert_eq!(rebuilt.dump_to_strings(), original.dump_to_strings());
    assert_eq!(encode_to_exif(&rebuilt).unwrap(), blob);
}

#[test]
fn copying_some_tags() {
    logger();
    let blob = encode_to_exif(&sample_tree(Endianness::Big)).unwrap();
    let parsed = parse_exif(&blob).unwrap();

    let mut only = IfdBuilder::new_root(Endianness::Big);
    only.add_tags_from_existing(&parsed.root, Some(&[0x000b, 0x8769]), None)
        .unwrap();
    let ids: Vec<u16> = only.tags().iter().map(|t| t.tag_id).collect();
    assert_eq!(ids, vec![0x000b, 0x8769]);
    assert_eq!(only.child(IfdGroup::Exif).unwrap().tags().len(), 2);

    let mut without = IfdBuilder::new_root(Endianness::Big);
    without
        .add_tags_from_existing(&parsed.root, None, Some(&[0x8769, 0x8825]))
        .unwrap();
    assert_eq!(without.tags().len(), 4);
    assert!(without.child(IfdGroup::Gps).is_none());
}
