use anyhow::{anyhow, Result};
use serde::Serialize;

/// Logical screen size in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

/// Physical device generation a screenshot was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    IPhone5s,
    IPhone6s,
    IPhone10,
    IPhone11,
    IPhone16,
}

impl DeviceClass {
    pub const ALL: [DeviceClass; 5] = [
        DeviceClass::IPhone5s,
        DeviceClass::IPhone6s,
        DeviceClass::IPhone10,
        DeviceClass::IPhone11,
        DeviceClass::IPhone16,
    ];

    /// Resolves the device class from exact capture pixel dimensions.
    ///
    /// The table is closed: an unknown pair means a device that has not been
    /// added yet, so it is reported as an error instead of being defaulted.
    pub fn from_pixel_size(width: u32, height: u32) -> Result<Self> {
        match (width, height) {
            (640, 1136) => Ok(DeviceClass::IPhone5s),
            (750, 1334) => Ok(DeviceClass::IPhone6s),
            (1125, 2436) => Ok(DeviceClass::IPhone10),
            (1170, 2532) => Ok(DeviceClass::IPhone11),
            (1206, 2622) => Ok(DeviceClass::IPhone16),
            _ => Err(anyhow!("no device class for pixel size {}x{}", width, height)),
        }
    }

    /// Short label, also the name of the matching image variant.
    pub fn label(self) -> &'static str {
        match self {
            DeviceClass::IPhone5s => "5s",
            DeviceClass::IPhone6s => "6s",
            DeviceClass::IPhone10 => "10",
            DeviceClass::IPhone11 => "11",
            DeviceClass::IPhone16 => "16",
        }
    }

    pub fn display_size(self) -> DisplaySize {
        let (width, height) = match self {
            DeviceClass::IPhone5s => (320, 568),
            DeviceClass::IPhone6s => (375, 667),
            DeviceClass::IPhone10 => (375, 812),
            DeviceClass::IPhone11 => (390, 844),
            DeviceClass::IPhone16 => (402, 874),
        };
        DisplaySize { width, height }
    }
}

impl Serialize for DeviceClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
