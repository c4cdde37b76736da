//! # Primitive Shape Generation
//!
//! Box and cylinder generators. All shapes carry outward normals and UVs.

use super::GeometryData;
use std::f32::consts::PI;

/// Default radial resolution for cylinders
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 32;

/// Generate a box centered at the origin
///
/// `width` runs along X, `height` along Y and `depth` along Z. Each face has
/// its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-hx, -hy,  hz], [ hx, -hy,  hz], [ hx,  hy,  hz], [-hx,  hy,  hz],
        // Back face
        [-hx, -hy, -hz], [-hx,  hy, -hz], [ hx,  hy, -hz], [ hx, -hy, -hz],
        // Left face
        [-hx, -hy, -hz], [-hx, -hy,  hz], [-hx,  hy,  hz], [-hx,  hy, -hz],
        // Right face
        [ hx, -hy,  hz], [ hx, -hy, -hz], [ hx,  hy, -hz], [ hx,  hy,  hz],
        // Top face
        [-hx,  hy,  hz], [ hx,  hy,  hz], [ hx,  hy, -hz], [-hx,  hy, -hz],
        // Bottom face
        [-hx, -hy, -hz], [ hx, -hy, -hz], [ hx, -hy,  hz], [-hx, -hy,  hz],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    // Two counter-clockwise triangles per face
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a closed cylinder aligned with the Y axis
///
/// # Arguments
/// * `radius_top` - Radius of the cap at `+height / 2`
/// * `radius_bottom` - Radius of the cap at `-height / 2`
/// * `height` - Length along Y
/// * `radial_segments` - Number of segments around the circumference
///
/// Cap vertices are separate from the side vertices so the caps shade flat.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // Side: row 0 is the top ring, row 1 the bottom ring
    for row in 0..=1u32 {
        let v = row as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let y = -v * height + half_height;

        for i in 0..=segs {
            let u = i as f32 / segs as f32;
            let theta = u * 2.0 * PI;
            let (sin_t, cos_t) = theta.sin_cos();

            data.vertices.push([radius * sin_t, y, radius * cos_t]);
            data.normals.push(normalize([sin_t, slope, cos_t]));
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    let ring = segs + 1;
    for i in 0..segs {
        let a = i;
        let b = ring + i;
        let c = ring + i + 1;
        let d = i + 1;

        data.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    push_cap(&mut data, segs, radius_top, half_height, true);
    push_cap(&mut data, segs, radius_bottom, half_height, false);

    data
}

fn push_cap(data: &mut GeometryData, segs: u32, radius: f32, half_height: f32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let y = half_height * sign;

    // One centre vertex per segment keeps the cap UVs seam-free
    let center_start = data.vertices.len() as u32;
    for _ in 0..segs {
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, sign, 0.0]);
        data.tex_coords.push([0.5, 0.5]);
    }

    let rim_start = data.vertices.len() as u32;
    for i in 0..=segs {
        let theta = i as f32 / segs as f32 * 2.0 * PI;
        let (sin_t, cos_t) = theta.sin_cos();

        data.vertices.push([radius * sin_t, y, radius * cos_t]);
        data.normals.push([0.0, sign, 0.0]);
        data.tex_coords.push([cos_t * 0.5 + 0.5, sin_t * 0.5 * sign + 0.5]);
    }

    for i in 0..segs {
        let center = center_start + i;
        let rim = rim_start + i;
        if top {
            data.indices.extend_from_slice(&[rim, rim + 1, center]);
        } else {
            data.indices.extend_from_slice(&[rim + 1, rim, center]);
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        v
    }
}
