/// Converts an upstream dim level (0-100, possibly fractional) into a host brightness (0-255).
pub trait DimLevelConversions {
    fn dim_level_to_brightness(self) -> u8;
}

/// Converts a host brightness (0-255) into a whole upstream dim level (0-100).
pub trait BrightnessConversions {
    fn brightness_to_dim_level(self) -> u8;
}

impl DimLevelConversions for f64 {
    fn dim_level_to_brightness(self) -> u8 {
        (self.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8
    }
}

impl BrightnessConversions for u8 {
    fn brightness_to_dim_level(self) -> u8 {
        ((u32::from(self) * 100 + 127) / 255) as u8
    }
}
