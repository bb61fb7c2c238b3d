use fast_srgb8::{f32_to_srgb8, srgb8_to_f32};

#[allow(non_camel_case_types)]
pub type sRGB = [u8; 3];

pub const NAVY: sRGB = [0x0B, 0x1D, 0x3A];
pub const ACCENT_BLUE: sRGB = [0x00, 0x6E, 0xC7];
pub const LIGHT_BLUE: sRGB = [0x4D, 0xA8, 0xDA];
pub const GREEN: sRGB = [0x28, 0xA7, 0x45];
pub const RED: sRGB = [0xDC, 0x35, 0x45];
pub const ORANGE: sRGB = [0xFD, 0x7E, 0x14];
pub const GOLD: sRGB = [0xFF, 0xC1, 0x07];
pub const TEAL: sRGB = [0x17, 0xA2, 0xB8];
pub const PURPLE: sRGB = [0x6F, 0x42, 0xC1];
pub const LIGHT_GRAY: sRGB = [0xF0, 0xF4, 0xF8];
pub const POV_GRAY: sRGB = [0xE8, 0xEE, 0xF4];
pub const BORDER_GRAY: sRGB = [0xD0, 0xD8, 0xE0];
pub const GRID_GRAY: sRGB = [0xE0, 0xE0, 0xE0];
pub const MID_GRAY: sRGB = [0xA0, 0xAE, 0xC0];
pub const MEDIUM_GRAY: sRGB = [0x6C, 0x75, 0x7D];
pub const DARK_GRAY: sRGB = [0x34, 0x3A, 0x40];
pub const WHITE: sRGB = [0xFF, 0xFF, 0xFF];

/// Semantic slots the renderers ask for instead of hardcoding hex values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    TitleBar,
    Brand,
    Background,
    Panel,
    PanelBorder,
    Grid,
    Text,
    MutedText,
    Anchor,
    Increase,
    Decrease,
    Connector,
}

impl ColorRole {
    pub fn color(self) -> sRGB {
        match self {
            ColorRole::TitleBar => NAVY,
            ColorRole::Brand => ACCENT_BLUE,
            ColorRole::Background => LIGHT_GRAY,
            ColorRole::Panel => WHITE,
            ColorRole::PanelBorder => BORDER_GRAY,
            ColorRole::Grid => GRID_GRAY,
            ColorRole::Text => DARK_GRAY,
            ColorRole::MutedText => MID_GRAY,
            ColorRole::Anchor => ACCENT_BLUE,
            ColorRole::Increase => GREEN,
            ColorRole::Decrease => RED,
            ColorRole::Connector => MID_GRAY,
        }
    }
}

pub fn as_index(c: &sRGB) -> usize {
    let mut out: usize = c[2] as usize;
    out |= (c[1] as usize) << 8;
    out |= (c[0] as usize) << 16;
    out
}

pub fn to_string(c: &sRGB) -> String {
    format!("#{:06x}", as_index(c)).to_uppercase()
}

#[derive(Debug, Clone, Copy)]
struct RGB {
    r: f32,
    g: f32,
    b: f32,
}

impl From<sRGB> for RGB {
    fn from(c: sRGB) -> Self {
        RGB {
            r: srgb8_to_f32(c[0]),
            g: srgb8_to_f32(c[1]),
            b: srgb8_to_f32(c[2]),
        }
    }
}

impl From<RGB> for sRGB {
    fn from(c: RGB) -> Self {
        [f32_to_srgb8(c.r), f32_to_srgb8(c.g), f32_to_srgb8(c.b)]
    }
}

/// Composites `fg` at `alpha` over `bg` in linear light.
///
/// Used to bake translucent fills (area charts, faded bars) into opaque colors so the
/// PNG and PDF outputs agree.
pub fn mix(fg: &sRGB, bg: &sRGB, alpha: f32) -> sRGB {
    let a = alpha.clamp(0.0, 1.0);
    let f: RGB = (*fg).into();
    let b: RGB = (*bg).into();
    RGB {
        r: f.r * a + b.r * (1.0 - a),
        g: f.g * a + b.g * (1.0 - a),
        b: f.b * a + b.b * (1.0 - a),
    }
    .into()
}

#[allow(non_snake_case)]
fn apca_luminance(c: &sRGB) -> f32 {
    const S_TRC: f32 = 2.4;
    const B_THRSH: f32 = 0.022;
    const B_CLIP: f32 = 1.414;

    let Y_c = ((c[0] as f32) / 255.0).powf(S_TRC) * 0.2126729
        + ((c[1] as f32) / 255.0).powf(S_TRC) * 0.7151522
        + ((c[2] as f32) / 255.0).powf(S_TRC) * 0.0721750;

    if Y_c < 0.0 {
        0.0
    } else if Y_c < B_THRSH {
        Y_c + (B_THRSH - Y_c).powf(B_CLIP)
    } else {
        Y_c
    }
}

// Implementation of https://github.com/Myndex/SAPC-APCA/blob/master/documentation/APCA-W3-LaTeX.md.
#[allow(non_snake_case)]
pub fn APCA(text: &sRGB, bg: &sRGB) -> f32 {
    const NTX: f32 = 0.57;
    const NBG: f32 = 0.56;
    const RTX: f32 = 0.62;
    const RGB: f32 = 0.65;
    const W_SCALE: f32 = 1.14;
    const W_OFFSET: f32 = 0.027;

    let Y_txt = apca_luminance(text);
    let Y_bg = apca_luminance(bg);

    let S_apc = if Y_txt < Y_bg {
        Y_bg.powf(NBG) - Y_txt.powf(NTX)
    } else {
        Y_bg.powf(RGB) - Y_txt.powf(RTX)
    } * W_SCALE;

    if S_apc.abs() < W_OFFSET {
        0.0
    } else if S_apc > 0.0 {
        100.0 * (S_apc - W_OFFSET)
    } else {
        -100.0 * (S_apc + W_OFFSET)
    }
}

/// Picks whichever of white or navy reads better on `bg`.
pub fn text_color_for(bg: &sRGB) -> sRGB {
    if APCA(&WHITE, bg) >= APCA(&NAVY, bg) {
        WHITE
    } else {
        NAVY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Source: https://git.apcacontrast.com/documentation/README
    #[test]
    fn test_apca() {
        let c_888: sRGB = [0x88, 0x88, 0x88];
        let c_fff: sRGB = [0xff, 0xff, 0xff];
        let c_000: sRGB = [0x00, 0x00, 0x00];
        let c_aaa: sRGB = [0xaa, 0xaa, 0xaa];

        let eps = 2.0_f32.powi(-17);

        assert_abs_diff_eq!(63.056469930209424, APCA(&c_888, &c_fff), epsilon = eps);
        assert_abs_diff_eq!(68.54146436644962, APCA(&c_fff, &c_888), epsilon = eps);

        assert_abs_diff_eq!(58.146262578561334, APCA(&c_000, &c_aaa), epsilon = eps);
        assert_abs_diff_eq!(56.24113336839742, APCA(&c_aaa, &c_000), epsilon = eps);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&NAVY), "#0B1D3A");
        assert_eq!(to_string(&WHITE), "#FFFFFF");
    }

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(mix(&ACCENT_BLUE, &WHITE, 1.0), ACCENT_BLUE);
        assert_eq!(mix(&ACCENT_BLUE, &WHITE, 0.0), WHITE);
        let faded = mix(&ACCENT_BLUE, &WHITE, 0.08);
        // a light tint stays brighter than the source in every channel
        assert!(faded.iter().zip(ACCENT_BLUE.iter()).all(|(f, s)| f >= s));
    }

    #[test]
    fn test_text_color_for() {
        assert_eq!(text_color_for(&NAVY), WHITE);
        assert_eq!(text_color_for(&GOLD), NAVY);
        assert_eq!(text_color_for(&LIGHT_GRAY), NAVY);
    }

    #[test]
    fn test_bridge_roles() {
        assert_eq!(ColorRole::Anchor.color(), ACCENT_BLUE);
        assert_eq!(ColorRole::Increase.color(), GREEN);
        assert_eq!(ColorRole::Decrease.color(), RED);
    }
}
