//! Definitions for tags in an IFD group.
//!
//! # `tags`
//!
//! Contains the known tags of each [`IfdGroup`], keyed by tag ID, along with
//! the primitive type(s) each one accepts.
//!
//! Tag names here are the canonical CamelCase names (the ones Exiv2 and most
//! tooling print), like `Make`, `ExifTag`, or `GPSLatitude`.
//!
//! ## For contributors
//!
//! <div class="warning">
//! The rest of this documentation is here to assist contributors.
//!
//! It won't be helpful unless you're trying to add support for new tags.
//! </div>
//!
//! ### Adding new tags
//!
//! Each row in a `make_key_list_for_group!` call looks like this:
//!
//! ```no_compile
//! YourNewKey = 0x1234, [Ascii], Known(1), "Short description";
//! ```
//!
//! The identifier becomes the tag's canonical name, so spell it exactly as
//! the standard does. Types are [`PrimitiveTy`] variants and the count is a
//! [`PrimitiveCount`].
//!
//! ### Adding new groups
//!
//! 1. add the group to [`IfdGroup`] (and its parent/pointer-tag info)
//! 2. create a new call to `make_key_list_for_group!`
//! 3. add a new variant on [`KnownTag`] and forward its methods

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::exif::{
    ifd::IfdGroup,
    primitives::{PrimitiveCount, PrimitiveTy},
};

use PrimitiveCount::{Any, Known, SpecialHandling};

/// Creates a "key list" for an IFD group.
///
/// These may include duplicate tag IDs from other groups.
macro_rules! make_key_list_for_group {
    (enum $enum_name:ident => $ifd_group:expr,
        $( $key_ident:ident = $key_tag:literal, [$( $ty:ident ),+], $count:expr, $desc:literal; )+
    ) => {
        #[doc = "A list of all keys present in the matching `IfdGroup` variant."]
        #[repr(u16)]
        #[non_exhaustive]
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $key_ident = $key_tag,
            )+
        }

        impl $enum_name {
            /// Every key in this group, in table order.
            pub const ALL: &'static [$enum_name] = &[ $( $enum_name::$key_ident, )+ ];

            /// Returns the number of primitives this key's value may store.
            pub const fn count(&self) -> PrimitiveCount {
                match self {
                    $( Self::$key_ident => $count, )+
                }
            }

            /// Returns the `IfdGroup` that this enum represents.
            pub const fn ifd_group() -> IfdGroup {
                $ifd_group
            }

            /// Returns this key's tag ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs a key's canonical tag name.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => stringify!($key_ident), )+
                }
            }

            /// A short, human description of the key.
            pub const fn description(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => $desc, )+
                }
            }

            /// Returns the type(s) this key's value may have.
            pub const fn types(&self) -> &'static [PrimitiveTy] {
                match self {
                    $( Self::$key_ident => &[ $( PrimitiveTy::$ty, )+ ], )+
                }
            }
        }

        impl core::convert::TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $key_tag => Ok($enum_name::$key_ident), )+
                    _ => Err(()),
                }
            }
        }
    }
}

/// A set of all known tags and their IFD groups.
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum KnownTag {
    Ifd0Tag(Ifd0Tag),
    ExifIfdTag(ExifIfdTag),
    GpsIfdTag(GpsIfdTag),
    InteropIfdTag(InteropIfdTag),
}

impl KnownTag {
    /// Returns the number of primitives this tag's value may store.
    ///
    /// ```
    /// use exif_tree_types::exif::{
    ///     tags::{KnownTag, Ifd0Tag},
    ///     primitives::PrimitiveCount
    /// };
    ///
    /// let image_width: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth);
    /// assert_eq!(image_width.count(), PrimitiveCount::Known(1));
    /// ```
    pub const fn count(&self) -> PrimitiveCount {
        match self {
            KnownTag::Ifd0Tag(k) => k.count(),
            KnownTag::ExifIfdTag(k) => k.count(),
            KnownTag::GpsIfdTag(k) => k.count(),
            KnownTag::InteropIfdTag(k) => k.count(),
        }
    }

    /// Returns the `IfdGroup` this tag belongs to.
    ///
    /// ```
    /// use exif_tree_types::exif::{tags::{KnownTag, GpsIfdTag}, ifd::IfdGroup};
    ///
    /// let lat: KnownTag = KnownTag::GpsIfdTag(GpsIfdTag::GPSLatitude);
    /// assert_eq!(lat.ifd_group(), IfdGroup::Gps);
    /// ```
    pub const fn ifd_group(self) -> IfdGroup {
        match self {
            KnownTag::Ifd0Tag(_) => Ifd0Tag::ifd_group(),
            KnownTag::ExifIfdTag(_) => ExifIfdTag::ifd_group(),
            KnownTag::GpsIfdTag(_) => GpsIfdTag::ifd_group(),
            KnownTag::InteropIfdTag(_) => InteropIfdTag::ifd_group(),
        }
    }

    /// Returns this tag's tag ID.
    ///
    /// ```
    /// use exif_tree_types::exif::tags::{KnownTag, Ifd0Tag};
    ///
    /// let image_width: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth);
    /// assert_eq!(image_width.tag_id(), 0x0100_u16);
    /// ```
    pub const fn tag_id(&self) -> u16 {
        match self {
            KnownTag::Ifd0Tag(k) => *k as u16,
            KnownTag::ExifIfdTag(k) => *k as u16,
            KnownTag::GpsIfdTag(k) => *k as u16,
            KnownTag::InteropIfdTag(k) => *k as u16,
        }
    }

    /// Grabs a tag's canonical name.
    ///
    /// ```
    /// use exif_tree_types::exif::tags::{KnownTag, ExifIfdTag};
    ///
    /// let f_number: KnownTag = KnownTag::ExifIfdTag(ExifIfdTag::FNumber);
    /// assert_eq!(f_number.tag_name(), "FNumber");
    /// ```
    pub const fn tag_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.tag_name(),
            KnownTag::ExifIfdTag(k) => k.tag_name(),
            KnownTag::GpsIfdTag(k) => k.tag_name(),
            KnownTag::InteropIfdTag(k) => k.tag_name(),
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.description(),
            KnownTag::ExifIfdTag(k) => k.description(),
            KnownTag::GpsIfdTag(k) => k.description(),
            KnownTag::InteropIfdTag(k) => k.description(),
        }
    }

    /// Returns the type(s) this tag's value may have.
    ///
    /// ```
    /// use exif_tree_types::exif::{
    ///     tags::{KnownTag, Ifd0Tag},
    ///     primitives::PrimitiveTy
    /// };
    ///
    /// let image_width: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::ImageWidth);
    /// assert_eq!(image_width.types(), &[PrimitiveTy::Short, PrimitiveTy::Long]);
    /// ```
    pub const fn types(&self) -> &'static [PrimitiveTy] {
        match self {
            KnownTag::Ifd0Tag(k) => k.types(),
            KnownTag::ExifIfdTag(k) => k.types(),
            KnownTag::GpsIfdTag(k) => k.types(),
            KnownTag::InteropIfdTag(k) => k.types(),
        }
    }

    /// Checks whether a value of type `ty` may be stored under this tag.
    ///
    /// `AsciiNoNul` is accepted wherever `Ascii` is.
    pub fn supports_type(&self, ty: PrimitiveTy) -> bool {
        let ty = match ty {
            PrimitiveTy::AsciiNoNul => PrimitiveTy::Ascii,
            other => other,
        };

        self.types().contains(&ty)
    }

    /// All known tags, group by group (in [`IfdGroup::ALL`] order).
    pub fn all() -> impl Iterator<Item = KnownTag> {
        IfdGroup::ALL.iter().flat_map(|g| Self::all_in_group(*g))
    }

    /// All known tags of one group.
    pub fn all_in_group(group: IfdGroup) -> Box<dyn Iterator<Item = KnownTag>> {
        match group {
            IfdGroup::Root => Box::new(Ifd0Tag::ALL.iter().copied().map(KnownTag::Ifd0Tag)),
            IfdGroup::Exif => Box::new(ExifIfdTag::ALL.iter().copied().map(KnownTag::ExifIfdTag)),
            IfdGroup::Gps => Box::new(GpsIfdTag::ALL.iter().copied().map(KnownTag::GpsIfdTag)),
            IfdGroup::Interop => Box::new(
                InteropIfdTag::ALL
                    .iter()
                    .copied()
                    .map(KnownTag::InteropIfdTag),
            ),
        }
    }

    /// Finds a tag in `group` by its canonical name.
    ///
    /// ```
    /// use exif_tree_types::exif::{ifd::IfdGroup, tags::{KnownTag, GpsIfdTag}};
    ///
    /// assert_eq!(
    ///     KnownTag::from_name(IfdGroup::Gps, "GPSAltitude"),
    ///     Some(KnownTag::GpsIfdTag(GpsIfdTag::GPSAltitude))
    /// );
    /// assert_eq!(KnownTag::from_name(IfdGroup::Root, "GPSAltitude"), None);
    /// ```
    pub fn from_name(group: IfdGroup, name: &str) -> Option<KnownTag> {
        NAME_INDEX.get(&(group, name)).copied()
    }
}

impl core::fmt::Display for KnownTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} (0x{:04x}) in [{}]",
            self.tag_name(),
            self.tag_id(),
            self.ifd_group()
        )
    }
}

impl TryFrom<(IfdGroup, u16)> for KnownTag {
    type Error = ();

    fn try_from(value: (IfdGroup, u16)) -> Result<Self, Self::Error> {
        let (ifd_group, tag_id): (IfdGroup, u16) = value;

        match ifd_group {
            IfdGroup::Root => Ifd0Tag::try_from(tag_id).map(KnownTag::Ifd0Tag),
            IfdGroup::Exif => ExifIfdTag::try_from(tag_id).map(KnownTag::ExifIfdTag),
            IfdGroup::Gps => GpsIfdTag::try_from(tag_id).map(KnownTag::GpsIfdTag),
            IfdGroup::Interop => InteropIfdTag::try_from(tag_id).map(KnownTag::InteropIfdTag),
        }
    }
}

/// Reverse lookup: (group, canonical name) -> tag.
static NAME_INDEX: LazyLock<FxHashMap<(IfdGroup, &'static str), KnownTag>> =
    LazyLock::new(|| {
        KnownTag::all()
            .map(|tag| ((tag.ifd_group(), tag.tag_name()), tag))
            .collect()
    });

/*
 *
 *
 *
 *  IFD0 (TIFF Rev. 6.0 attributes, plus common extensions)
 *
 *
 *
 */
make_key_list_for_group!(enum Ifd0Tag => IfdGroup::Root,
    ProcessingSoftware = 0x000b, [Ascii], Any, "Name and version of the processing software";
    NewSubfileType = 0x00fe, [Long], Known(1), "Kind of data in this subfile";
    SubfileType = 0x00ff, [Short], Known(1), "Kind of data in this subfile (deprecated)";

    //
    // image data structure
    ImageWidth = 0x0100, [Short, Long], Known(1), "Image width";
    ImageLength = 0x0101, [Short, Long], Known(1), "Image height";
    BitsPerSample = 0x0102, [Short], Known(3), "Number of bits per component";
    Compression = 0x0103, [Short], Known(1), "Compression scheme";
    PhotometricInterpretation = 0x0106, [Short], Known(1), "Pixel composition";
    Thresholding = 0x0107, [Short], Known(1), "Thresholding used for bilevel images";
    CellWidth = 0x0108, [Short], Known(1), "Width of the dithering matrix";
    CellLength = 0x0109, [Short], Known(1), "Height of the dithering matrix";
    FillOrder = 0x010a, [Short], Known(1), "Logical order of bits within a byte";
    DocumentName = 0x010d, [Ascii], Any, "Name of the scanned document";
    ImageDescription = 0x010e, [Ascii], Any, "Description of image";
    Make = 0x010f, [Ascii], Any, "Image input equipment manufacturer";
    Model = 0x0110, [Ascii], Any, "Image input equipment model";
    StripOffsets = 0x0111, [Short, Long], SpecialHandling, "Offset to strip";
    Orientation = 0x0112, [Short], Known(1), "Orientation of image";
    SamplesPerPixel = 0x0115, [Short], Known(1), "Number of components";
    RowsPerStrip = 0x0116, [Short, Long], Known(1), "Number of rows per strip";
    StripByteCounts = 0x0117, [Short, Long], SpecialHandling, "Bytes per compressed strip";
    XResolution = 0x011a, [Rational], Known(1), "Image resolution in width direction";
    YResolution = 0x011b, [Rational], Known(1), "Image resolution in height direction";
    PlanarConfiguration = 0x011c, [Short], Known(1), "Image data arrangement";
    PageName = 0x011d, [Ascii], Any, "Name of the page";
    XPosition = 0x011e, [Rational], Known(1), "X position of the image";
    YPosition = 0x011f, [Rational], Known(1), "Y position of the image";
    ResolutionUnit = 0x0128, [Short], Known(1), "Unit of X and Y resolution";
    PageNumber = 0x0129, [Short], Known(2), "Page number";
    TransferFunction = 0x012d, [Short], Known(768), "Transfer function";
    Software = 0x0131, [Ascii], Any, "Software used";
    DateTime = 0x0132, [Ascii], Known(20), "File change date and time";
    Artist = 0x013b, [Ascii], Any, "Person who created the image";
    HostComputer = 0x013c, [Ascii], Any, "Computer used to create the image";
    Predictor = 0x013d, [Short], Known(1), "Predictor applied before encoding";
    WhitePoint = 0x013e, [Rational], Known(2), "White point chromaticity";
    PrimaryChromaticities = 0x013f, [Rational], Known(6), "Chromaticities of primaries";
    TileWidth = 0x0142, [Short, Long], Known(1), "Tile width";
    TileLength = 0x0143, [Short, Long], Known(1), "Tile height";
    TileOffsets = 0x0144, [Short, Long], SpecialHandling, "Offset to each tile";
    TileByteCounts = 0x0145, [Short, Long], SpecialHandling, "Bytes per compressed tile";
    SubIFDs = 0x014a, [Long], Any, "Offsets to child IFDs";
    InkSet = 0x014c, [Short], Known(1), "Set of inks used";
    DotRange = 0x0150, [Byte, Short], Any, "Component values for 0% and 100% dots";
    ExtraSamples = 0x0152, [Short], Any, "Description of extra components";
    SampleFormat = 0x0153, [Short], Any, "How to interpret each data sample";
    JPEGProc = 0x0200, [Long], Known(1), "JPEG process used";

    //
    // recording offset
    JPEGInterchangeFormat = 0x0201, [Long], Known(1), "Offset to JPEG SOI";
    JPEGInterchangeFormatLength = 0x0202, [Long], Known(1), "Bytes of JPEG data";

    //
    // image data characteristics
    YCbCrCoefficients = 0x0211, [Rational], Known(3), "Color space transformation matrix coefficients";
    YCbCrSubSampling = 0x0212, [Short], Known(2), "Subsampling ratio of Y to C";
    YCbCrPositioning = 0x0213, [Short], Known(1), "Y and C positioning";
    ReferenceBlackWhite = 0x0214, [Rational], Known(6), "Pair of black and white reference values";
    XMLPacket = 0x02bc, [Byte], Any, "XMP metadata";
    Rating = 0x4746, [Short], Known(1), "Rating";
    RatingPercent = 0x4749, [Short], Known(1), "Rating as a percentage";
    ImageID = 0x800d, [Ascii], Any, "Identifier of the original image";
    CFARepeatPatternDim = 0x828d, [Short], Known(2), "CFA repeat pattern dimensions";
    BatteryLevel = 0x828f, [Rational], Known(1), "Battery level";
    Copyright = 0x8298, [Ascii], Any, "Copyright holder";
    IPTCNAA = 0x83bb, [Long], Any, "IPTC/NAA record";
    ImageResources = 0x8649, [Byte], Any, "Photoshop image resources";

    //
    // pointers to other IFDs
    ExifTag = 0x8769, [Long], Known(1), "Exif IFD pointer";
    InterColorProfile = 0x8773, [Undefined], Any, "ICC profile";
    GPSTag = 0x8825, [Long], Known(1), "GPS info IFD pointer";

    //
    // tags that some writers place in IFD0
    ShutterSpeedValue = 0x9201, [SRational], Known(1), "Shutter speed";
    XPTitle = 0x9c9b, [Byte], Any, "Title (UCS-2)";
    XPComment = 0x9c9c, [Byte], Any, "Comment (UCS-2)";
    XPAuthor = 0x9c9d, [Byte], Any, "Author (UCS-2)";
    XPKeywords = 0x9c9e, [Byte], Any, "Keywords (UCS-2)";
    XPSubject = 0x9c9f, [Byte], Any, "Subject (UCS-2)";
    PrintImageMatching = 0xc4a5, [Undefined], Any, "Print Image Matching data";
    DNGVersion = 0xc612, [Byte], Known(4), "DNG version";
    DNGBackwardVersion = 0xc613, [Byte], Known(4), "Oldest DNG version this file is compatible with";
    UniqueCameraModel = 0xc614, [Ascii], Any, "Unique camera model";
);

/*
 *
 *
 *
 *  Exif IFD attributes
 *
 *
 *
 */
make_key_list_for_group!(enum ExifIfdTag => IfdGroup::Exif,
    //
    // picture-taking conditions
    ExposureTime = 0x829a, [Rational], Known(1), "Exposure time";
    FNumber = 0x829d, [Rational], Known(1), "F number";
    ExposureProgram = 0x8822, [Short], Known(1), "Exposure program";
    SpectralSensitivity = 0x8824, [Ascii], Any, "Spectral sensitivity";
    ISOSpeedRatings = 0x8827, [Short], Any, "Photographic sensitivity";
    OECF = 0x8828, [Undefined], Any, "Optoelectric conversion factor";
    SensitivityType = 0x8830, [Short], Known(1), "Sensitivity type";
    StandardOutputSensitivity = 0x8831, [Long], Known(1), "Standard output sensitivity";
    RecommendedExposureIndex = 0x8832, [Long], Known(1), "Recommended exposure index";
    ISOSpeed = 0x8833, [Long], Known(1), "ISO speed";
    ISOSpeedLatitudeyyy = 0x8834, [Long], Known(1), "ISO speed latitude yyy";
    ISOSpeedLatitudezzz = 0x8835, [Long], Known(1), "ISO speed latitude zzz";

    //
    // version
    ExifVersion = 0x9000, [Undefined], Known(4), "Exif version";

    //
    // date and time
    DateTimeOriginal = 0x9003, [Ascii], Known(20), "Date and time of original data generation";
    DateTimeDigitized = 0x9004, [Ascii], Known(20), "Date and time of digital data generation";
    OffsetTime = 0x9010, [Ascii], Known(7), "Offset data of DateTime";
    OffsetTimeOriginal = 0x9011, [Ascii], Known(7), "Offset data of DateTimeOriginal";
    OffsetTimeDigitized = 0x9012, [Ascii], Known(7), "Offset data of DateTimeDigitized";

    //
    // image configuration
    ComponentsConfiguration = 0x9101, [Undefined], Known(4), "Meaning of each component";
    CompressedBitsPerPixel = 0x9102, [Rational], Known(1), "Image compression mode";
    ShutterSpeedValue = 0x9201, [SRational], Known(1), "Shutter speed";
    ApertureValue = 0x9202, [Rational], Known(1), "Aperture";
    BrightnessValue = 0x9203, [SRational], Known(1), "Brightness";
    ExposureBiasValue = 0x9204, [SRational], Known(1), "Exposure bias";
    MaxApertureValue = 0x9205, [Rational], Known(1), "Maximum lens aperture";
    SubjectDistance = 0x9206, [Rational], Known(1), "Subject distance";
    MeteringMode = 0x9207, [Short], Known(1), "Metering mode";
    LightSource = 0x9208, [Short], Known(1), "Light source";
    Flash = 0x9209, [Short], Known(1), "Flash";
    FocalLength = 0x920a, [Rational], Known(1), "Lens focal length";
    SubjectArea = 0x9214, [Short], Any, "Subject area";

    //
    // user information
    MakerNote = 0x927c, [Undefined], Any, "Manufacturer notes";
    UserComment = 0x9286, [Undefined], Any, "User comments";
    SubSecTime = 0x9290, [Ascii], Any, "DateTime subseconds";
    SubSecTimeOriginal = 0x9291, [Ascii], Any, "DateTimeOriginal subseconds";
    SubSecTimeDigitized = 0x9292, [Ascii], Any, "DateTimeDigitized subseconds";

    //
    // shooting situation
    Temperature = 0x9400, [SRational], Known(1), "Temperature";
    Humidity = 0x9401, [Rational], Known(1), "Humidity";
    Pressure = 0x9402, [Rational], Known(1), "Pressure";
    WaterDepth = 0x9403, [SRational], Known(1), "Water depth";
    Acceleration = 0x9404, [Rational], Known(1), "Acceleration";
    CameraElevationAngle = 0x9405, [SRational], Known(1), "Camera elevation angle";

    //
    // Flashpix and image data characteristics
    FlashpixVersion = 0xa000, [Undefined], Known(4), "Supported Flashpix version";
    ColorSpace = 0xa001, [Short], Known(1), "Color space information";
    PixelXDimension = 0xa002, [Short, Long], Known(1), "Valid image width";
    PixelYDimension = 0xa003, [Short, Long], Known(1), "Valid image height";
    RelatedSoundFile = 0xa004, [Ascii], Known(13), "Related audio file";
    InteroperabilityTag = 0xa005, [Long], Known(1), "Interoperability IFD pointer";

    //
    // more picture-taking conditions
    FlashEnergy = 0xa20b, [Rational], Known(1), "Flash energy";
    SpatialFrequencyResponse = 0xa20c, [Undefined], Any, "Spatial frequency response";
    FocalPlaneXResolution = 0xa20e, [Rational], Known(1), "Focal plane X resolution";
    FocalPlaneYResolution = 0xa20f, [Rational], Known(1), "Focal plane Y resolution";
    FocalPlaneResolutionUnit = 0xa210, [Short], Known(1), "Focal plane resolution unit";
    SubjectLocation = 0xa214, [Short], Known(2), "Subject location";
    ExposureIndex = 0xa215, [Rational], Known(1), "Exposure index";
    SensingMethod = 0xa217, [Short], Known(1), "Sensing method";
    FileSource = 0xa300, [Undefined], Known(1), "File source";
    SceneType = 0xa301, [Undefined], Known(1), "Scene type";
    CFAPattern = 0xa302, [Undefined], Any, "CFA pattern";
    CustomRendered = 0xa401, [Short], Known(1), "Custom image processing";
    ExposureMode = 0xa402, [Short], Known(1), "Exposure mode";
    WhiteBalance = 0xa403, [Short], Known(1), "White balance";
    DigitalZoomRatio = 0xa404, [Rational], Known(1), "Digital zoom ratio";
    FocalLengthIn35mmFilm = 0xa405, [Short], Known(1), "Focal length in 35 mm film";
    SceneCaptureType = 0xa406, [Short], Known(1), "Scene capture type";
    GainControl = 0xa407, [Short], Known(1), "Gain control";
    Contrast = 0xa408, [Short], Known(1), "Contrast";
    Saturation = 0xa409, [Short], Known(1), "Saturation";
    Sharpness = 0xa40a, [Short], Known(1), "Sharpness";
    DeviceSettingDescription = 0xa40b, [Undefined], Any, "Device settings description";
    SubjectDistanceRange = 0xa40c, [Short], Known(1), "Subject distance range";

    //
    // other
    ImageUniqueID = 0xa420, [Ascii], Known(33), "Unique image ID";
    CameraOwnerName = 0xa430, [Ascii], Any, "Camera owner name";
    BodySerialNumber = 0xa431, [Ascii], Any, "Body serial number";
    LensSpecification = 0xa432, [Rational], Known(4), "Lens specification";
    LensMake = 0xa433, [Ascii], Any, "Lens make";
    LensModel = 0xa434, [Ascii], Any, "Lens model";
    LensSerialNumber = 0xa435, [Ascii], Any, "Lens serial number";
    ImageTitle = 0xa436, [Ascii], Any, "Title of image";
    Photographer = 0xa437, [Ascii], Any, "Photographer name";
    ImageEditor = 0xa438, [Ascii], Any, "Person who edited the image";
    CameraFirmware = 0xa439, [Ascii], Any, "Camera firmware";
    RAWDevelopingSoftware = 0xa43a, [Ascii], Any, "RAW developing software";
    ImageEditingSoftware = 0xa43b, [Ascii], Any, "Image editing software";
    MetadataEditingSoftware = 0xa43c, [Ascii], Any, "Metadata editing software";
    CompositeImage = 0xa460, [Short], Known(1), "Composite image";
    SourceImageNumberOfCompositeImage = 0xa461, [Short], Known(2), "Source image number of composite image";
    SourceExposureTimesOfCompositeImage = 0xa462, [Undefined], Any, "Source exposure times of composite image";
    Gamma = 0xa500, [Rational], Known(1), "Gamma";
);

/*
 *
 *
 *
 *  GPS IFD attributes
 *
 *
 *
 */
make_key_list_for_group!(enum GpsIfdTag => IfdGroup::Gps,
    GPSVersionID = 0x0000, [Byte], Known(4), "GPS tag version";
    GPSLatitudeRef = 0x0001, [Ascii], Known(2), "North or South latitude";
    GPSLatitude = 0x0002, [Rational], Known(3), "Latitude";
    GPSLongitudeRef = 0x0003, [Ascii], Known(2), "East or West longitude";
    GPSLongitude = 0x0004, [Rational], Known(3), "Longitude";
    GPSAltitudeRef = 0x0005, [Byte], Known(1), "Altitude reference";
    GPSAltitude = 0x0006, [Rational], Known(1), "Altitude";
    GPSTimeStamp = 0x0007, [Rational], Known(3), "GPS time (atomic clock)";
    GPSSatellites = 0x0008, [Ascii], Any, "GPS satellites used for measurement";
    GPSStatus = 0x0009, [Ascii], Known(2), "GPS receiver status";
    GPSMeasureMode = 0x000a, [Ascii], Known(2), "GPS measurement mode";
    GPSDOP = 0x000b, [Rational], Known(1), "Measurement precision";
    GPSSpeedRef = 0x000c, [Ascii], Known(2), "Speed unit";
    GPSSpeed = 0x000d, [Rational], Known(1), "Speed of GPS receiver";
    GPSTrackRef = 0x000e, [Ascii], Known(2), "Reference for direction of movement";
    GPSTrack = 0x000f, [Rational], Known(1), "Direction of movement";
    GPSImgDirectionRef = 0x0010, [Ascii], Known(2), "Reference for direction of image";
    GPSImgDirection = 0x0011, [Rational], Known(1), "Direction of image";
    GPSMapDatum = 0x0012, [Ascii], Any, "Geodetic survey data used";
    GPSDestLatitudeRef = 0x0013, [Ascii], Known(2), "Reference for latitude of destination";
    GPSDestLatitude = 0x0014, [Rational], Known(3), "Latitude of destination";
    GPSDestLongitudeRef = 0x0015, [Ascii], Known(2), "Reference for longitude of destination";
    GPSDestLongitude = 0x0016, [Rational], Known(3), "Longitude of destination";
    GPSDestBearingRef = 0x0017, [Ascii], Known(2), "Reference for bearing of destination";
    GPSDestBearing = 0x0018, [Rational], Known(1), "Bearing of destination";
    GPSDestDistanceRef = 0x0019, [Ascii], Known(2), "Reference for distance to destination";
    GPSDestDistance = 0x001a, [Rational], Known(1), "Distance to destination";
    GPSProcessingMethod = 0x001b, [Undefined], Any, "Name of GPS processing method";
    GPSAreaInformation = 0x001c, [Undefined], Any, "Name of GPS area";
    GPSDateStamp = 0x001d, [Ascii], Known(11), "GPS date";
    GPSDifferential = 0x001e, [Short], Known(1), "GPS differential correction";
    GPSHPositioningError = 0x001f, [Rational], Known(1), "Horizontal positioning error";
);

/*
 *
 *
 *
 *  Interoperability IFD attributes
 *
 *
 *
 */
make_key_list_for_group!(enum InteropIfdTag => IfdGroup::Interop,
    InteroperabilityIndex = 0x0001, [Ascii], Any, "Interoperability identification";
    InteroperabilityVersion = 0x0002, [Undefined], Known(4), "Interoperability version";
    RelatedImageFileFormat = 0x1000, [Ascii], Any, "File format of image file";
    RelatedImageWidth = 0x1001, [Short, Long], Known(1), "Image width";
    RelatedImageLength = 0x1002, [Short, Long], Known(1), "Image height";
);
