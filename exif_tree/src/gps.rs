//! Position and time from the GPS IFD.

use exif_tree_types::exif::{ifd::IfdGroup, primitives::Rational};

use crate::{
    error::{ExifFieldError, ExifFieldResult, LookupError, LookupResult},
    ifd::Ifd,
    value::{ExifTimestamp, Value},
};

const GPS_VERSION_ID: u16 = 0x0000;
const GPS_LATITUDE_REF: u16 = 0x0001;
const GPS_LATITUDE: u16 = 0x0002;
const GPS_LONGITUDE_REF: u16 = 0x0003;
const GPS_LONGITUDE: u16 = 0x0004;
const GPS_ALTITUDE_REF: u16 = 0x0005;
const GPS_ALTITUDE: u16 = 0x0006;
const GPS_TIME_STAMP: u16 = 0x0007;
const GPS_DATE_STAMP: u16 = 0x001d;

/// GPS versions we know how to read.
pub const VALID_GPS_VERSIONS: [[u8; 4]; 3] = [[2, 0, 0, 0], [2, 2, 0, 0], [2, 3, 0, 0]];

/// Whether two floats are equal, or one step apart.
fn within_one_ulp(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }

    // floats of one sign order like their bits
    if a.is_sign_negative() != b.is_sign_negative() || a.is_nan() || b.is_nan() {
        return false;
    }

    a.to_bits().abs_diff(b.to_bits()) <= 1
}

/// A latitude or longitude, in degrees, minutes, and seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsDegrees {
    /// One of `N`, `S`, `E`, or `W`.
    pub orientation: char,
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl GpsDegrees {
    /// Makes a coordinate from its reference tag (like `N`) and its three
    /// rationals.
    ///
    /// ```
    /// use exif_tree::gps::GpsDegrees;
    /// use exif_tree_types::exif::primitives::Rational;
    ///
    /// let lat = GpsDegrees::new_from_rationals(
    ///     "N",
    ///     &[Rational::new(45, 1), Rational::new(30, 1), Rational::new(0, 1)],
    /// )
    /// .unwrap();
    /// assert_eq!(lat.decimal(), 45.5);
    /// ```
    pub fn new_from_rationals(reference: &str, rationals: &[Rational]) -> ExifFieldResult<Self> {
        let mut chars = reference.chars();
        let (Some(orientation), None, [d, m, s]) = (chars.next(), chars.next(), rationals) else {
            let e = ExifFieldError::BadGpsCoordinate {
                ref_len: reference.chars().count(),
                rationals: rationals.len(),
            };
            log::warn!("Couldn't read GPS coordinate. err: {e}");
            return Err(e);
        };

        let ratio = |r: &Rational| r.numerator as f64 / r.denominator as f64;

        Ok(Self {
            orientation,
            degrees: ratio(d),
            minutes: ratio(m),
            seconds: ratio(s),
        })
    }

    /// Turns the coordinate back into rationals, each with a denominator of
    /// one.
    pub fn raw(&self) -> [Rational; 3] {
        [
            Rational::new(self.degrees as u32, 1),
            Rational::new(self.minutes as u32, 1),
            Rational::new(self.seconds as u32, 1),
        ]
    }

    /// The coordinate as one signed number. South and west are negative.
    pub fn decimal(&self) -> f64 {
        let decimal = self.degrees + self.minutes / 60.0 + self.seconds / 3600.0;

        match self.orientation {
            'S' | 'W' => -decimal,
            _ => decimal,
        }
    }

    /// Compares two coordinates, allowing each part to be off by one ulp.
    pub fn equals(&self, other: &GpsDegrees) -> bool {
        self.orientation == other.orientation
            && within_one_ulp(self.degrees, other.degrees)
            && within_one_ulp(self.minutes, other.minutes)
            && within_one_ulp(self.seconds, other.seconds)
    }
}

impl core::fmt::Display for GpsDegrees {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Degrees<O=[{}] D=({}) M=({}) S=({})>",
            self.orientation, self.degrees, self.minutes, self.seconds
        )
    }
}

/// What a GPS IFD says about where and when.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsInfo {
    pub latitude: GpsDegrees,
    pub longitude: GpsDegrees,

    /// Meters. Negative is below sea level.
    pub altitude: i32,

    /// When the fix was taken. All zeroes when the IFD doesn't say.
    pub timestamp: ExifTimestamp,
}

impl GpsInfo {
    /// Reads the GPS info out of a GPS IFD.
    pub fn from_ifd(ifd: &Ifd<'_>) -> LookupResult<Self> {
        if ifd.group() != IfdGroup::Gps {
            log::error!("GPS info can only be read from [{}]. got: [{}]", IfdGroup::Gps, ifd.identity());
            return Err(LookupError::WrongIfd {
                expected: IfdGroup::Gps,
                got: ifd.identity().fully_qualified_path(),
            });
        }

        match first_value(ifd, GPS_VERSION_ID) {
            None => log::warn!("No GPS version found. Assuming it's one we can read."),
            Some(version) => {
                let Value::Bytes(version) = version? else {
                    return Err(LookupError::GpsVersionUnsupported { got: Vec::new() });
                };

                if !VALID_GPS_VERSIONS.iter().any(|v| v.as_slice() == version) {
                    log::warn!("GPS version isn't supported. got: `{version:?}`");
                    return Err(LookupError::GpsVersionUnsupported { got: version });
                }
            }
        }

        let latitude = coordinate(ifd, GPS_LATITUDE_REF, GPS_LATITUDE)?;
        let longitude = coordinate(ifd, GPS_LONGITUDE_REF, GPS_LONGITUDE)?;

        Ok(Self {
            latitude,
            longitude,
            altitude: altitude(ifd)?,
            timestamp: timestamp(ifd)?,
        })
    }
}

impl core::fmt::Display for GpsInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "GpsInfo<LAT=({:.05}) LON=({:.05}) ALT=({}) TIME=[{}]>",
            self.latitude.decimal(),
            self.longitude.decimal(),
            self.altitude,
            self.timestamp
        )
    }
}

/// The value of the first entry with `tag_id`, if there is one.
fn first_value(ifd: &Ifd<'_>, tag_id: u16) -> Option<LookupResult<Value>> {
    let entry = ifd.find_tag_with_id(tag_id).ok()?.into_iter().next()?;
    Some(entry.value().map_err(LookupError::from))
}

fn coordinate(ifd: &Ifd<'_>, ref_tag: u16, tag: u16) -> LookupResult<GpsDegrees> {
    let (Some(reference), Some(rationals)) = (first_value(ifd, ref_tag), first_value(ifd, tag))
    else {
        log::warn!("GPS IFD is missing tag (0x{tag:04x}) or its reference.");
        return Err(LookupError::NoGpsTags);
    };

    match (reference?, rationals?) {
        (Value::Ascii(reference), Value::Rationals(rationals)) => {
            Ok(GpsDegrees::new_from_rationals(&reference, &rationals)?)
        }
        _ => Err(LookupError::NoGpsTags),
    }
}

fn altitude(ifd: &Ifd<'_>) -> LookupResult<i32> {
    let (Some(altitude), Some(reference)) =
        (first_value(ifd, GPS_ALTITUDE), first_value(ifd, GPS_ALTITUDE_REF))
    else {
        return Ok(0);
    };

    let (Value::Rationals(altitude), Value::Bytes(reference)) = (altitude?, reference?) else {
        return Ok(0);
    };

    let Some(altitude) = altitude.first().filter(|r| r.denominator > 0) else {
        return Ok(0);
    };

    let whole = altitude.numerator / altitude.denominator;
    let Ok(mut meters) = i32::try_from(whole) else {
        let e = ExifFieldError::UnparseableValue {
            tag_id: GPS_ALTITUDE,
            reason: format!("altitude ({whole}) doesn't fit in an i32"),
        };
        log::warn!("Couldn't read GPS altitude. err: {e}");
        return Err(e.into());
    };
    if reference.first() == Some(&1) {
        meters = -meters;
    }
    Ok(meters)
}

fn timestamp(ifd: &Ifd<'_>) -> LookupResult<ExifTimestamp> {
    let (Some(date), Some(time)) = (first_value(ifd, GPS_DATE_STAMP), first_value(ifd, GPS_TIME_STAMP))
    else {
        return Ok(ExifTimestamp::default());
    };

    let (Value::Ascii(date), Value::Rationals(time)) = (date?, time?) else {
        return Ok(ExifTimestamp::default());
    };

    // some writers use dashes
    let date = date.replace('-', ":");
    let mut parts = date.split(':').map(|p| p.trim().parse::<u16>().ok());
    let (Some(Some(year)), Some(Some(month)), Some(Some(day))) =
        (parts.next(), parts.next(), parts.next())
    else {
        log::warn!("Couldn't read GPS date stamp. got: `{date}`");
        return Ok(ExifTimestamp::default());
    };

    let whole = |r: Option<&Rational>| -> Option<u8> {
        let r = r.filter(|r| r.denominator > 0)?;
        u8::try_from(r.numerator / r.denominator).ok()
    };
    let (Some(hour), Some(minute), Some(second), Ok(month), Ok(day)) = (
        whole(time.first()),
        whole(time.get(1)),
        whole(time.get(2)),
        u8::try_from(month),
        u8::try_from(day),
    ) else {
        log::warn!("Couldn't read GPS time stamp. got: `{time:?}`");
        return Ok(ExifTimestamp::default());
    };

    Ok(ExifTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::primitives::Rational;

    use super::{GpsDegrees, within_one_ulp};
    use crate::error::ExifFieldError;

    #[test]
    fn degrees_from_rationals() {
        let degrees = GpsDegrees::new_from_rationals(
            "W",
            &[Rational::new(22, 2), Rational::new(66, 3), Rational::new(132, 4)],
        )
        .unwrap();

        assert_eq!(degrees.orientation, 'W');
        assert!(within_one_ulp(degrees.degrees, 11.0));
        assert!(within_one_ulp(degrees.minutes, 22.0));
        assert!(within_one_ulp(degrees.seconds, 33.0));

        assert_eq!(
            degrees.raw(),
            [Rational::new(11, 1), Rational::new(22, 1), Rational::new(33, 1)]
        );
        assert!(degrees.decimal() < 0.0);

        let same = GpsDegrees {
            orientation: 'W',
            degrees: 11.0,
            minutes: 22.0,
            seconds: 33.0,
        };
        assert!(degrees.equals(&same));
        assert_eq!(same.to_string(), "Degrees<O=[W] D=(11) M=(22) S=(33)>");
    }

    #[test]
    fn bad_coordinates() {
        assert_eq!(
            GpsDegrees::new_from_rationals("NW", &[Rational::new(1, 1); 3]),
            Err(ExifFieldError::BadGpsCoordinate {
                ref_len: 2,
                rationals: 3
            })
        );
        assert!(GpsDegrees::new_from_rationals("N", &[Rational::new(1, 1); 2]).is_err());
    }

    #[test]
    fn ulp_tolerance() {
        let a = 0.1_f64 + 0.2;
        assert!(within_one_ulp(a, 0.3));
        assert!(!within_one_ulp(0.3, 0.31));
        assert!(within_one_ulp(0.0, -0.0));
    }
}
