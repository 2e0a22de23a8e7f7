//! Triangle soup loading and procedural scene generation.

use crate::{error::Error, rng::XorShift32, triangle::Triangle};
use glam::Vec3;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Loads a `.tri` triangle soup: whitespace-separated floats, nine per
/// triangle (three vertices), terminated by a line whose first value is
/// `999`.
///
/// Values may be split across lines arbitrarily; only their order matters.
pub fn load_tri_file<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>, Error> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut triangles = Vec::new();
    let mut values = [0.0f32; 9];
    let mut filled = 0;

    'lines: for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let value: f32 = token.parse().map_err(|_| Error::ParseMesh {
                path: path.to_path_buf(),
                line: line_no + 1,
            })?;
            // sentinel closing the list
            if filled == 0 && value == 999.0 {
                break 'lines;
            }
            values[filled] = value;
            filled += 1;
            if filled == 9 {
                triangles.push(Triangle::new(
                    Vec3::new(values[0], values[1], values[2]),
                    Vec3::new(values[3], values[4], values[5]),
                    Vec3::new(values[6], values[7], values[8]),
                ));
                filled = 0;
            }
        }
    }

    log::info!("loaded {} triangles from {}", triangles.len(), path.display());
    Ok(triangles)
}

/// Generates `count` small random triangles scattered over [-5, 4)^3.
///
/// Each triangle anchors its first vertex uniformly in the cube and offsets
/// the other two by unit-cube edge vectors, so triangles stay small relative
/// to the scene and hierarchies built over them have meaningful structure.
pub fn random_triangles(count: usize, rng: &mut XorShift32) -> Vec<Triangle> {
    let rand_vec3 = |rng: &mut XorShift32| {
        Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32())
    };

    (0..count)
        .map(|_| {
            let r0 = rand_vec3(rng);
            let r1 = rand_vec3(rng);
            let r2 = rand_vec3(rng);
            let v0 = r0 * 9.0 - Vec3::splat(5.0);
            Triangle::new(v0, v0 + r1, v0 + r2)
        })
        .collect()
}
