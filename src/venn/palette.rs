//! Fixed categorical palette for set fills.
//!
//! Reports compare diagrams across runs, so set `i` must always get
//! `PALETTE[i]`. Append new colors at the end; never reorder.

/// Ordered fill colors, as `#RRGGBB`.
pub const PALETTE: [&str; 141] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2",
    "#7F7F7F", "#BCBD22", "#17BECF", "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3",
    "#FF7F00", "#A65628", "#F781BF", "#66C2A5", "#FC8D62", "#8DA0CB", "#A6D854",
    "#FFD92F", "#E5C494", "#B3B3B3", "#00FFFF", "#7FFFD4", "#FFE4C4", "#FFEBCD",
    "#0000FF", "#8A2BE2", "#A52A2A", "#DEB887", "#5F9EA0", "#7FFF00", "#D2691E",
    "#FF7F50", "#6495ED", "#DC143C", "#00008B", "#008B8B", "#B8860B", "#A9A9A9",
    "#006400", "#BDB76B", "#8B008B", "#556B2F", "#FF8C00", "#9932CC", "#8B0000",
    "#E9967A", "#8FBC8F", "#483D8B", "#2F4F4F", "#00CED1", "#9400D3", "#FF1493",
    "#00BFFF", "#696969", "#1E90FF", "#B22222", "#228B22", "#FF00FF", "#DCDCDC",
    "#FFD700", "#DAA520", "#808080", "#008000", "#ADFF2F", "#FF69B4", "#CD5C5C",
    "#4B0082", "#F0E68C", "#E6E6FA", "#7CFC00", "#ADD8E6", "#F08080", "#D3D3D3",
    "#90EE90", "#FFB6C1", "#FFA07A", "#20B2AA", "#87CEFA", "#778899", "#B0C4DE",
    "#00FF00", "#32CD32", "#800000", "#66CDAA", "#0000CD", "#BA55D3", "#9370DB",
    "#3CB371", "#7B68EE", "#00FA9A", "#48D1CC", "#C71585", "#191970", "#FFE4E1",
    "#FFE4B5", "#FFDEAD", "#000080", "#808000", "#6B8E23", "#FFA500", "#FF4500",
    "#DA70D6", "#EEE8AA", "#98FB98", "#AFEEEE", "#DB7093", "#FFEFD5", "#FFDAB9",
    "#CD853F", "#FFC0CB", "#DDA0DD", "#B0E0E6", "#800080", "#663399", "#FF0000",
    "#BC8F8F", "#4169E1", "#8B4513", "#FA8072", "#F4A460", "#2E8B57", "#A0522D",
    "#C0C0C0", "#87CEEB", "#6A5ACD", "#708090", "#00FF7F", "#4682B4", "#D2B48C",
    "#008080", "#D8BFD8", "#FF6347", "#40E0D0", "#EE82EE", "#F5DEB3", "#FFFF00",
    "#9ACD32",
];

/// The first `n` palette colors, in order.
pub fn palette(n: usize) -> Vec<&'static str> {
    PALETTE.iter().copied().take(n).collect()
}

/// Parse a `#RRGGBB` palette entry into its channels.
pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
