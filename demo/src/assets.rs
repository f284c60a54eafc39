use nes::rle::Rle;
use nes_asset_macros::include_rle;

/// Border and cartridge silhouette, 32×30 tiles plus attributes.
pub const LOGO: Rle<'static> = include_rle!("assets/logo.nam");
