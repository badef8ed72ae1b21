use exif_tree::{
    builder::IfdBuilder,
    encode::encode_to_exif,
    enumerate::parse_exif,
    error::{ExifFieldError, LookupError},
    gps::GpsDegrees,
    value::ExifTimestamp,
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

fn rationals(whole: [u32; 3]) -> Vec<Rational> {
    whole.iter().map(|n| Rational::new(*n, 1)).collect()
}

fn with_gps(fill: impl FnOnce(&mut IfdBuilder)) -> Vec<u8> {
    let mut root = IfdBuilder::new_root(Endianness::Little);
    root.add_standard_with_name("Make", "Canon").unwrap();

    let mut gps = root.new_child(IfdGroup::Gps).unwrap();
    fill(&mut gps);
    root.add_child(gps).unwrap();

    encode_to_exif(&root).unwrap()
}

#[test]
fn reads_position_and_time() {
    logger();
    let blob = with_gps(|gps| {
        gps.add_standard_with_name("GPSVersionID", vec![2_u8, 2, 0, 0]).unwrap();
        gps.add_standard_with_name("GPSLatitudeRef", "N").unwrap();
        gps.add_standard_with_name("GPSLatitude", rationals([26, 35, 12])).unwrap();
        gps.add_standard_with_name("GPSLongitudeRef", "W").unwrap();
        gps.add_standard_with_name("GPSLongitude", rationals([80, 3, 13])).unwrap();
        gps.add_standard_with_name("GPSAltitudeRef", vec![1_u8]).unwrap();
        gps.add_standard_with_name("GPSAltitude", vec![Rational::new(240, 2)]).unwrap();
        gps.add_standard_with_name("GPSTimeStamp", rationals([1, 22, 57])).unwrap();
        gps.add_standard_with_name("GPSDateStamp", "2018-04-29").unwrap();
    });

    let exif = parse_exif(&blob).unwrap();
    let info = exif.lookup("IFD/GPSInfo").unwrap().gps_info().unwrap();

    assert!(info.latitude.equals(&GpsDegrees {
        orientation: 'N',
        degrees: 26.0,
        minutes: 35.0,
        seconds: 12.0,
    }));
    assert_eq!(info.longitude.orientation, 'W');
    assert!(info.longitude.decimal() < 0.0);
    assert_eq!(info.altitude, -120);
    assert_eq!(
        info.timestamp,
        ExifTimestamp {
            year: 2018,
            month: 4,
            day: 29,
            hour: 1,
            minute: 22,
            second: 57,
        }
    );
    assert_eq!(
        info.to_string(),
        "GpsInfo<LAT=(26.58667) LON=(-80.05361) ALT=(-120) TIME=[2018:04:29 01:22:57]>"
    );
}

#[test]
fn missing_pieces() {
    logger();

    // no position at all
    let blob = with_gps(|gps| {
        gps.add_standard_with_name("GPSVersionID", vec![2_u8, 3, 0, 0]).unwrap();
    });
    let exif = parse_exif(&blob).unwrap();
    assert_eq!(
        exif.lookup("IFD/GPSInfo").unwrap().gps_info(),
        Err(LookupError::NoGpsTags)
    );

    // a version we don't know
    let blob = with_gps(|gps| {
        gps.add_standard_with_name("GPSVersionID", vec![9_u8, 9, 0, 0]).unwrap();
    });
    let exif = parse_exif(&blob).unwrap();
    assert_eq!(
        exif.lookup("IFD/GPSInfo").unwrap().gps_info(),
        Err(LookupError::GpsVersionUnsupported {
            got: vec![9, 9, 0, 0]
        })
    );

    // no altitude or time is fine
    let blob = with_gps(|gps| {
        gps.add_standard_with_name("GPSLatitudeRef", "S").unwrap();
        gps.add_standard_with_name("GPSLatitude", rationals([10, 0, 0])).unwrap();
        gps.add_standard_with_name("GPSLongitudeRef", "E").unwrap();
        gps.add_standard_with_name("GPSLongitude", rationals([20, 30, 0])).unwrap();
    });
    let exif = parse_exif(&blob).unwrap();
    let info = exif.lookup("IFD/GPSInfo").unwrap().gps_info().unwrap();
    assert_eq!(info.latitude.decimal(), -10.0);
    assert_eq!(info.longitude.decimal(), 20.5);
    assert_eq!(info.altitude, 0);
    assert!(info.timestamp.is_zero());

    // only the GPS IFD has GPS info
    assert_eq!(
        exif.root.gps_info(),
        Err(LookupError::WrongIfd {
            expected: IfdGroup::Gps,
            got: "IFD".into()
        })
    );
}

#[test]
fn altitude_too_high() {
    logger();
    let blob = with_gps(|gps| {
        gps.add_standard_with_name("GPSLatitudeRef", "N").unwrap();
        gps.add_standard_with_name("GPSLatitude", rationals([1, 0, 0])).unwrap();
        gps.add_standard_with_name("GPSLongitudeRef", "E").unwrap();
        gps.add_standard_with_name("GPSLongitude", rationals([1, 0, 0])).unwrap();
        gps.add_standard_with_name("GPSAltitudeRef", vec![0_u8]).unwrap();
        gps.add_standard_with_name("GPSAltitude", vec![Rational::new(3_000_000_000, 1)])
            .unwrap();
    });

    let exif = parse_exif(&blob).unwrap();
    assert!(matches!(
        exif.lookup("IFD/GPSInfo").unwrap().gps_info(),
        Err(LookupError::Field(ExifFieldError::UnparseableValue { tag_id: 0x0006, .. }))
    ));
}
