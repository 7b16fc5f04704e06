//! OBJ export of generated webs.
//!
//! Pure text conversion with no Bevy system dependencies. Webs are written
//! as vertices plus `l` line elements; OBJ indices are 1-based.

use std::fmt::Write;

use crate::webs::Webs;

/// Merged vertex/edge arrays as one OBJ object named `object_name`.
pub fn webs_to_obj(webs: &Webs, object_name: &str) -> String {
    let mut obj = String::new();
    let _ = writeln!(obj, "o {}", object_name);

    for pos in webs.verts() {
        let _ = writeln!(obj, "v {} {} {}", pos.x, pos.y, pos.z);
    }
    for [a, b] in webs.edges() {
        let _ = writeln!(obj, "l {} {}", a + 1, b + 1);
    }
    obj
}

/// Every thread polyline as its own OBJ object `{base_name}_{index}`, each
/// written as a single multi-point `l` element.
pub fn polylines_to_obj(webs: &Webs, base_name: &str) -> String {
    let mut obj = String::new();
    let mut vertex_offset = 0usize;

    for (i, polyline) in webs.polylines().iter().enumerate() {
        let _ = writeln!(obj, "o {}_{}", base_name, i);
        for pos in polyline {
            let _ = writeln!(obj, "v {} {} {}", pos.x, pos.y, pos.z);
        }
        obj.push('l');
        for j in 0..polyline.len() {
            let _ = write!(obj, " {}", vertex_offset + j + 1);
        }
        obj.push('\n');
        vertex_offset += polyline.len();
    }
    obj
}
