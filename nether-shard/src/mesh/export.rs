//! Wavefront OBJ export for inspecting sculpted shards

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ShardMesh;

/// Write a mesh as OBJ with positions, normals and faces
///
/// Non-indexed meshes are written as consecutive triangles. The auxiliary
/// scalars have no OBJ equivalent and are skipped.
///
/// # Example
/// ```no_run
/// use nether_shard::mesh::{generate_box, write_obj};
///
/// let mesh = generate_box(1.0, 2.0, 1.0, [4, 8, 4]);
/// write_obj(&mesh, "box.obj".as_ref(), "box")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_obj(mesh: &ShardMesh, path: &Path, name: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_obj_to(mesh, &mut w, name)?;
    w.flush()
}

fn write_obj_to<W: Write>(mesh: &ShardMesh, w: &mut W, name: &str) -> std::io::Result<()> {
    writeln!(w, "# nether-shard")?;
    writeln!(w, "o {}", name)?;

    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
    }

    // OBJ indices are 1-based
    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| i + 1);
        writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    Ok(())
}
