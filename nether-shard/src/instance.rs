//! Host renderer seam and live shard instances
//!
//! The library never touches a GPU. A host implements [`RenderHost`] to turn
//! plain mesh and raster data into its own handles; [`ShardInstance`] keeps
//! those handles in step with the seed and parameters across rebuilds.

use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::debug;

use crate::generator::{GenerateOptions, ShardGenerator};
use crate::mesh::ShardMesh;
use crate::params::{ShadingUniforms, ShardParams};
use crate::texture::{MaskRaster, Raster};

/// Default quiet window for coalescing parameter edits
pub const DEFAULT_REBUILD_DELAY: Duration = Duration::from_millis(150);

/// Host-side upload interface
///
/// Handles returned by the upload methods are owned by the caller and must
/// be handed back through the matching release method.
pub trait RenderHost {
    /// Host mesh handle (vertex/index buffers)
    type Mesh;

    /// Host texture handle
    type Texture;

    /// Upload a mesh, returning a new handle
    fn upload_mesh(&mut self, mesh: &ShardMesh) -> Self::Mesh;

    /// Upload a raster as a new texture
    fn upload_texture(&mut self, raster: &Raster) -> Self::Texture;

    /// Replace the contents of an existing mask texture
    fn upload_mask(&mut self, handle: &Self::Texture, mask: &Raster);

    fn release_mesh(&mut self, handle: Self::Mesh);

    fn release_texture(&mut self, handle: Self::Texture);
}

/// A shard that lives on a host
///
/// Not internally synchronized: at most one rebuild may run at a time.
pub struct ShardInstance<H: RenderHost> {
    seed: u32,
    params: ShardParams,
    options: GenerateOptions,
    uniforms: ShadingUniforms,
    mesh: H::Mesh,
    texture: H::Texture,
    mask: MaskRaster,
    mask_texture: H::Texture,
}

impl<H: RenderHost> ShardInstance<H> {
    /// Generate the shard and upload it along with a blank mask
    pub fn new(host: &mut H, seed: u32, params: ShardParams, options: GenerateOptions) -> Self {
        let shard = ShardGenerator::new(seed, params.clone()).generate(&options);
        let mask = MaskRaster::default();

        Self {
            seed,
            params,
            options,
            uniforms: shard.uniforms,
            mesh: host.upload_mesh(&shard.mesh),
            texture: host.upload_texture(&shard.texture),
            mask_texture: host.upload_texture(mask.raster()),
            mask,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn params(&self) -> &ShardParams {
        &self.params
    }

    /// Mutable parameters; changes take effect on the next [`rebuild`](Self::rebuild)
    pub fn params_mut(&mut self) -> &mut ShardParams {
        &mut self.params
    }

    /// Change the seed; takes effect on the next [`rebuild`](Self::rebuild)
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn uniforms(&self) -> &ShadingUniforms {
        &self.uniforms
    }

    pub fn mesh_handle(&self) -> &H::Mesh {
        &self.mesh
    }

    pub fn texture_handle(&self) -> &H::Texture {
        &self.texture
    }

    pub fn mask_handle(&self) -> &H::Texture {
        &self.mask_texture
    }

    pub fn mask(&self) -> &MaskRaster {
        &self.mask
    }

    /// Regenerate from the current seed and parameters
    ///
    /// The previous mesh and texture are released before the new handles are
    /// stored. The mask is kept.
    pub fn rebuild(&mut self, host: &mut H) {
        let shard = ShardGenerator::new(self.seed, self.params.clone()).generate(&self.options);

        let mesh = host.upload_mesh(&shard.mesh);
        let texture = host.upload_texture(&shard.texture);
        host.release_mesh(std::mem::replace(&mut self.mesh, mesh));
        host.release_texture(std::mem::replace(&mut self.texture, texture));
        self.uniforms = shard.uniforms;

        debug!("Rebuilt shard instance (seed {})", self.seed);
    }

    /// Stamp the mask; see [`MaskRaster::paint`]
    pub fn paint(&mut self, uv: Vec2, radius: f32) {
        self.mask.paint(uv, radius);
    }

    /// Reupload the mask if it changed, returning whether an upload happened
    pub fn sync_mask(&mut self, host: &mut H) -> bool {
        if !self.mask.is_dirty() {
            return false;
        }
        host.upload_mask(&self.mask_texture, self.mask.raster());
        self.mask.mark_clean();
        true
    }

    /// Release every host handle
    pub fn release(self, host: &mut H) {
        host.release_mesh(self.mesh);
        host.release_texture(self.texture);
        host.release_texture(self.mask_texture);
    }
}

/// Coalesces bursts of parameter edits into a single rebuild
///
/// Call [`request`](Self::request) on every edit and [`poll`](Self::poll)
/// once per frame; `poll` fires once the edits have been quiet for the delay.
#[derive(Debug, Clone)]
pub struct RebuildDebouncer {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Default for RebuildDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_REBUILD_DELAY)
    }
}

impl RebuildDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Record an edit at `now`, restarting the quiet window
    pub fn request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_request.is_some()
    }

    /// Whether a rebuild is due at `now`; clears the pending request if so
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_request {
            Some(last) if now.saturating_duration_since(last) >= self.delay => {
                self.last_request = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::BaseShape;
    use std::collections::HashSet;

    /// Host that hands out numbered handles and tracks which are live
    #[derive(Default)]
    struct FakeHost {
        next: u32,
        live: HashSet<u32>,
        mask_uploads: u32,
        uploaded_vertices: Vec<usize>,
    }

    impl FakeHost {
        fn alloc(&mut self) -> u32 {
            self.next += 1;
            self.live.insert(self.next);
            self.next
        }
    }

    impl RenderHost for FakeHost {
        type Mesh = u32;
        type Texture = u32;

        fn upload_mesh(&mut self, mesh: &ShardMesh) -> u32 {
            self.uploaded_vertices.push(mesh.vertex_count());
            self.alloc()
        }

        fn upload_texture(&mut self, _raster: &Raster) -> u32 {
            self.alloc()
        }

        fn upload_mask(&mut self, handle: &u32, _mask: &Raster) {
            assert!(self.live.contains(handle));
            self.mask_uploads += 1;
        }

        fn release_mesh(&mut self, handle: u32) {
            assert!(self.live.remove(&handle), "double release");
        }

        fn release_texture(&mut self, handle: u32) {
            assert!(self.live.remove(&handle), "double release");
        }
    }

    fn small_options() -> GenerateOptions {
        GenerateOptions {
            shape: BaseShape::Box {
                segments: [4, 6, 4],
            },
            texture_size: 8,
            edge_overlay: false,
        }
    }

    #[test]
    fn test_new_uploads_three_handles() {
        let mut host = FakeHost::default();
        let instance = ShardInstance::new(&mut host, 42, ShardParams::default(), small_options());
        assert_eq!(host.live.len(), 3);
        assert_eq!(host.uploaded_vertices, vec![2 * (5 * 7 + 5 * 5 + 7 * 5)]);

        instance.release(&mut host);
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_rebuild_does_not_leak() {
        let mut host = FakeHost::default();
        let mut instance = ShardInstance::new(&mut host, 42, ShardParams::default(), small_options());

        for i in 0..10 {
            instance.params_mut().habit = Some(i as f32 / 10.0);
            instance.rebuild(&mut host);
            assert_eq!(host.live.len(), 3);
            assert!(host.live.contains(instance.mesh_handle()));
            assert!(host.live.contains(instance.texture_handle()));
        }
    }

    #[test]
    fn test_rebuild_keeps_mask() {
        let mut host = FakeHost::default();
        let mut instance = ShardInstance::new(&mut host, 1, ShardParams::default(), small_options());
        let mask_handle = *instance.mask_handle();

        instance.paint(Vec2::splat(0.5), 10.0);
        instance.set_seed(2);
        instance.rebuild(&mut host);

        assert_eq!(*instance.mask_handle(), mask_handle);
        assert!(instance.mask().is_dirty());
        assert_eq!(instance.seed(), 2);
    }

    #[test]
    fn test_sync_mask_only_when_dirty() {
        let mut host = FakeHost::default();
        let mut instance = ShardInstance::new(&mut host, 7, ShardParams::default(), small_options());

        assert!(!instance.sync_mask(&mut host));
        instance.paint(Vec2::new(0.1, 0.9), 5.0);
        assert!(instance.sync_mask(&mut host));
        assert!(!instance.sync_mask(&mut host));
        assert_eq!(host.mask_uploads, 1);
    }

    #[test]
    fn test_uniforms_follow_params() {
        let mut host = FakeHost::default();
        let mut instance = ShardInstance::new(&mut host, 7, ShardParams::default(), small_options());

        instance.params_mut().ior = Some(1.5);
        assert_eq!(instance.uniforms().ior, crate::params::DEFAULT_IOR);
        instance.rebuild(&mut host);
        assert_eq!(instance.uniforms().ior, 1.5);
    }

    #[test]
    fn test_debouncer_coalesces_burst() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let mut debouncer = RebuildDebouncer::default();

        assert!(!debouncer.poll(start));
        for t in [0, 40, 80, 120] {
            debouncer.request(start + ms(t));
            assert!(!debouncer.poll(start + ms(t + 10)));
        }

        // Quiet window counts from the last edit
        assert!(!debouncer.poll(start + ms(200)));
        assert!(debouncer.poll(start + ms(270)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + ms(500)));
    }

    #[test]
    fn test_debouncer_clock_going_backwards() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut debouncer = RebuildDebouncer::new(Duration::from_millis(10));
        debouncer.request(start);
        assert!(!debouncer.poll(start - Duration::from_millis(500)));
        assert!(debouncer.is_pending());
    }
}
