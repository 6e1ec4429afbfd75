use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::math::{Quat, Vec3};
use crate::mesh::{cylinder, Mesh};

/// Parameters controlling recursive branch growth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Deepest iteration; segments at this depth spawn no children
    pub recursion_rate: u32,
    /// Child slots tried per segment
    pub branch_factor: u32,
    /// Base tilt of a child away from its parent's axis, in degrees
    pub angle: f32,
    /// Width and height multiplier from one depth to the next
    pub resize_factor: f32,
    /// Trunk radius
    pub width: f32,
    /// Trunk length
    pub height: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            recursion_rate: 1,
            branch_factor: 4,
            angle: 30.0,
            resize_factor: 2.0 / 3.0,
            width: 0.5,
            height: 2.0,
        }
    }
}

/// Placement of one branch segment, derived from its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchState {
    pub iteration: u32,
    pub center: Vec3,
    pub rotation: Quat,
    pub width: f32,
    pub height: f32,
}

impl BranchState {
    pub fn root(center: Vec3, params: &GrowthParams) -> Self {
        Self {
            iteration: 0,
            center,
            rotation: Quat::IDENTITY,
            width: params.width,
            height: params.height,
        }
    }

    /// Segment axis scaled to its height, in world space
    pub fn direction(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, self.height, 0.0)
    }

    /// Center of the top ring
    pub fn tip(&self) -> Vec3 {
        self.direction() + self.center
    }

    fn child(&self, rotation: Quat, resize_factor: f32) -> Self {
        Self {
            iteration: self.iteration + 1,
            center: self.tip(),
            rotation,
            width: self.width * resize_factor,
            height: self.height * resize_factor,
        }
    }
}

/// Where one segment landed in the output buffers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRecord {
    pub depth: u32,
    pub vertex_start: u32,
    pub vertex_count: u32,
    pub index_start: u32,
    pub index_count: u32,
    pub center: Vec3,
    pub rotation: Quat,
    pub width: f32,
    pub height: f32,
}

/// Recursive cylinder tree generator
///
/// Every call emits one uniform-width segment, then tries `branch_factor`
/// child slots at its tip. A slot spawns when `u * recursion_rate >
/// iteration` for a fresh uniform `u`, so deeper segments branch less often.
/// Children are fanned evenly around the parent axis and tilted by
/// `angle` plus an integer jitter in [-10, 9] degrees.
pub struct BranchGrowth {
    pub params: GrowthParams,
    sectors: usize,
    center: Vec3,
}

impl BranchGrowth {
    pub fn new(params: GrowthParams, sectors: usize, center: Vec3) -> Self {
        Self { params, sectors, center }
    }

    /// Grow a tree from a seeded PCG stream
    pub fn grow(&self, seed: u64) -> Mesh {
        let mut rng = Pcg32::seed_from_u64(seed);
        self.grow_with_rng(&mut rng)
    }

    /// Grow a tree drawing from `rng` in call order
    pub fn grow_with_rng<R: Rng>(&self, rng: &mut R) -> Mesh {
        let mut mesh = Mesh::new();
        self.generate(self.root_state(), &mut mesh, rng, None);
        self.finish(&mut mesh);
        mesh
    }

    /// Grow a tree and report where every segment was written
    pub fn grow_tracked<R: Rng>(&self, rng: &mut R) -> (Mesh, Vec<SegmentRecord>) {
        let mut mesh = Mesh::new();
        let mut records = Vec::new();
        self.generate(self.root_state(), &mut mesh, rng, Some(&mut records));
        self.finish(&mut mesh);
        (mesh, records)
    }

    pub fn root_state(&self) -> BranchState {
        BranchState::root(self.center, &self.params)
    }

    /// Emit the segment for `state` into `mesh`, then recurse into children
    pub fn generate<R: Rng>(
        &self,
        state: BranchState,
        mesh: &mut Mesh,
        rng: &mut R,
        mut records: Option<&mut Vec<SegmentRecord>>,
    ) {
        let vertex_start = mesh.vertices.len() as u32;
        let index_start = mesh.indices.len() as u32;

        let segment = cylinder::build(
            state.height,
            state.width,
            state.width,
            state.width,
            state.width,
            self.sectors,
            vertex_start,
        );
        mesh.add_vertices(segment.transformed(state.rotation, state.center));
        mesh.add_indices(segment.indices);

        log::trace!(
            "segment depth={} at {:?} width={} height={}",
            state.iteration,
            state.center,
            state.width,
            state.height
        );

        if let Some(records) = records.as_deref_mut() {
            records.push(SegmentRecord {
                depth: state.iteration,
                vertex_start,
                vertex_count: mesh.vertices.len() as u32 - vertex_start,
                index_start,
                index_count: mesh.indices.len() as u32 - index_start,
                center: state.center,
                rotation: state.rotation,
                width: state.width,
                height: state.height,
            });
        }

        let params = &self.params;
        if state.iteration >= params.recursion_rate {
            return;
        }

        let direction = state.direction();
        for slot in 0..params.branch_factor {
            let u: f64 = rng.random();
            if u * params.recursion_rate as f64 <= state.iteration as f64 {
                continue;
            }

            let jitter = (rng.random::<f64>() * 20.0) as i32 - 10;
            let fan_angle = slot as f32 * 360.0 / params.branch_factor as f32;
            let fan = Quat::from_axis_angle(direction, fan_angle);
            let tilt = Quat::from_euler(0.0, 0.0, params.angle + jitter as f32);
            let rotation = fan * state.rotation * tilt;

            let child = state.child(rotation, params.resize_factor);
            self.generate(child, mesh, rng, records.as_deref_mut());
        }
    }

    /// Upper bound on emitted segments: every slot spawning at every depth
    pub fn worst_case_segments(&self) -> u64 {
        let b = self.params.branch_factor as u64;
        let mut level = 1u64;
        let mut total = 1u64;
        for _ in 0..self.params.recursion_rate {
            level = level.saturating_mul(b);
            if level == 0 {
                break;
            }
            total = total.saturating_add(level);
        }
        total
    }

    fn finish(&self, mesh: &mut Mesh) {
        mesh.calculate_bounds();
        log::debug!(
            "tree: {} segments, {} vertices, {} triangles",
            mesh.vertex_count() / (2 * self.sectors).max(1),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    const SECTORS: usize = 8;

    fn growth(params: GrowthParams) -> BranchGrowth {
        BranchGrowth::new(params, SECTORS, Vec3::ZERO)
    }

    fn tracked(params: GrowthParams, seed: u64) -> (Mesh, Vec<SegmentRecord>) {
        let mut rng = Pcg32::seed_from_u64(seed);
        growth(params).grow_tracked(&mut rng)
    }

    #[test]
    fn test_zero_branch_factor_emits_trunk_only() {
        for recursion_rate in [0, 1, 5, 12] {
            let params = GrowthParams {
                recursion_rate,
                branch_factor: 0,
                ..Default::default()
            };
            let (mesh, records) = tracked(params, 7);
            assert_eq!(records.len(), 1);
            assert_eq!(mesh.vertex_count(), 2 * SECTORS);
            assert_eq!(mesh.indices.len(), 6 * SECTORS);
        }
    }

    #[test]
    fn test_zero_recursion_rate_emits_trunk_only() {
        let params = GrowthParams {
            recursion_rate: 0,
            branch_factor: 6,
            ..Default::default()
        };
        let (_, records) = tracked(params, 1);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_every_slot_spawns_below_depth_one() {
        // With recursion_rate 1 the root test is u > 0, which holds for
        // any draw the generator realistically produces
        let params = GrowthParams {
            recursion_rate: 1,
            branch_factor: 4,
            ..Default::default()
        };
        let (_, records) = tracked(params, 99);
        assert_eq!(records.len(), 5);
        assert!(records[1..].iter().all(|r| r.depth == 1));
    }

    #[test]
    fn test_each_segment_appends_at_buffer_end() {
        let params = GrowthParams {
            recursion_rate: 4,
            branch_factor: 3,
            ..Default::default()
        };
        let (mesh, records) = tracked(params, 2024);

        let mut vertices = 0u32;
        let mut indices = 0u32;
        for r in &records {
            assert_eq!(r.vertex_start, vertices);
            assert_eq!(r.index_start, indices);
            assert_eq!(r.vertex_count, 2 * SECTORS as u32);
            assert_eq!(r.index_count, 6 * SECTORS as u32);
            vertices += r.vertex_count;
            indices += r.index_count;
        }

        assert_eq!(mesh.vertex_count() as u32, vertices);
        assert_eq!(mesh.indices.len() as u32, indices);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_segment_indices_address_own_vertices() {
        let params = GrowthParams {
            recursion_rate: 3,
            branch_factor: 3,
            ..Default::default()
        };
        let (mesh, records) = tracked(params, 5);

        for r in &records {
            let start = r.index_start as usize;
            let end = start + r.index_count as usize;
            let lo = r.vertex_start;
            let hi = r.vertex_start + r.vertex_count;
            assert!(mesh.indices[start..end].iter().all(|&i| i >= lo && i < hi));
        }
    }

    #[test]
    fn test_depth_never_exceeds_recursion_rate() {
        for seed in 0..20 {
            let params = GrowthParams {
                recursion_rate: 3,
                branch_factor: 4,
                ..Default::default()
            };
            let (_, records) = tracked(params, seed);
            assert!(records.iter().all(|r| r.depth <= 3));
            assert!(records.len() as u64 <= growth(params).worst_case_segments());
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let params = GrowthParams {
            recursion_rate: 4,
            branch_factor: 4,
            ..Default::default()
        };
        let a = growth(params).grow(42);
        let b = growth(params).grow(42);
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_children_start_at_parent_tip() {
        let params = GrowthParams {
            recursion_rate: 1,
            branch_factor: 3,
            height: 2.0,
            ..Default::default()
        };
        let (_, records) = tracked(params, 3);
        let tip = Vec3::new(0.0, 2.0, 0.0);
        for child in &records[1..] {
            assert!(child.center.approx_eq(&tip, 0.0001));
        }
    }

    #[test]
    fn test_children_shrink_by_resize_factor() {
        let params = GrowthParams {
            recursion_rate: 1,
            branch_factor: 2,
            resize_factor: 0.5,
            width: 0.8,
            height: 4.0,
            ..Default::default()
        };
        let (_, records) = tracked(params, 11);
        for child in &records[1..] {
            assert!((child.width - 0.4).abs() < 0.0001);
            assert!((child.height - 2.0).abs() < 0.0001);
        }
    }

    #[test]
    fn test_children_fan_and_tilt() {
        let params = GrowthParams {
            recursion_rate: 1,
            branch_factor: 4,
            angle: 30.0,
            ..Default::default()
        };
        let (_, records) = tracked(params, 8);
        let children = &records[1..];
        assert_eq!(children.len(), 4);

        let axes: Vec<Vec3> = children.iter().map(|r| r.rotation * Vec3::UP).collect();
        for axis in &axes {
            // Tilt is 30 degrees plus jitter in [-10, 9]
            let tilt = axis.dot(&Vec3::UP).clamp(-1.0, 1.0).acos().to_degrees();
            assert!((19.9..39.1).contains(&tilt), "tilt {}", tilt);
        }

        // Slots are a quarter turn apart around the trunk
        for pair in axes.windows(2) {
            let a = Vec3::new(pair[0].x, 0.0, pair[0].z).normalize();
            let b = Vec3::new(pair[1].x, 0.0, pair[1].z).normalize();
            assert!(a.dot(&b).abs() < 0.0001);
        }
    }

    /// Replays fixed uniform draws and counts how many were taken
    struct ScriptedRng {
        draws: Vec<f64>,
        taken: usize,
    }

    impl ScriptedRng {
        fn new(draws: &[f64]) -> Self {
            Self { draws: draws.to_vec(), taken: 0 }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        // A uniform f64 is built from the top 53 bits of next_u64
        fn next_u64(&mut self) -> u64 {
            let u = self.draws[self.taken];
            self.taken += 1;
            ((u * (1u64 << 53) as f64) as u64) << 11
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn tilt_between(a: Vec3, b: Vec3) -> f32 {
        a.normalize().dot(&b.normalize()).clamp(-1.0, 1.0).acos().to_degrees()
    }

    #[test]
    fn test_spawn_rule_and_draw_order() {
        let params = GrowthParams {
            recursion_rate: 2,
            branch_factor: 2,
            ..Default::default()
        };
        // root slot 0: 0.9 * 2 > 0 spawns, jitter draw 0.0 -> -10
        //   depth 1 slot 0: 0.5 * 2 > 1 fails, no jitter draw
        //   depth 1 slot 1: 0.75 * 2 > 1 spawns, jitter draw 0.99 -> +9
        //     depth 2 is at recursion_rate and draws nothing
        // root slot 1: 0.0 * 2 > 0 fails
        let mut rng = ScriptedRng::new(&[0.9, 0.0, 0.5, 0.75, 0.99, 0.0]);
        let (_, records) = growth(params).grow_tracked(&mut rng);

        let depths: Vec<u32> = records.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(rng.taken, 6);

        let trunk_axis = records[0].rotation * Vec3::UP;
        let branch_axis = records[1].rotation * Vec3::UP;
        let twig_axis = records[2].rotation * Vec3::UP;

        // 30 degrees with jitter -10, then 30 with jitter +9
        let branch_tilt = tilt_between(trunk_axis, branch_axis);
        assert!((branch_tilt - 20.0).abs() < 0.01, "tilt {}", branch_tilt);
        let twig_tilt = tilt_between(branch_axis, twig_axis);
        assert!((twig_tilt - 39.0).abs() < 0.01, "tilt {}", twig_tilt);
    }

    #[test]
    fn test_spawn_threshold_is_strict() {
        // 0.5 * 2 equals iteration 1 at depth 1, so the slot is pruned
        let params = GrowthParams {
            recursion_rate: 2,
            branch_factor: 1,
            ..Default::default()
        };
        let mut rng = ScriptedRng::new(&[0.6, 0.5, 0.5]);
        let (_, records) = growth(params).grow_tracked(&mut rng);

        assert_eq!(records.len(), 2);
        assert_eq!(rng.taken, 3);
    }

    #[test]
    fn test_root_ring_placement() {
        let params = GrowthParams {
            recursion_rate: 0,
            width: 0.5,
            height: 2.0,
            ..Default::default()
        };
        let center = Vec3::new(1.0, 2.0, 3.0);
        let mesh = BranchGrowth::new(params, 4, center).grow(0);

        assert!(mesh.vertices[0].approx_eq(&Vec3::new(1.0, 2.0, 3.5), 0.0001));
        assert!(mesh.vertices[4].approx_eq(&Vec3::new(1.0, 4.0, 3.5), 0.0001));
    }

    #[test]
    fn test_worst_case_segments() {
        let params = GrowthParams {
            recursion_rate: 3,
            branch_factor: 4,
            ..Default::default()
        };
        assert_eq!(growth(params).worst_case_segments(), 1 + 4 + 16 + 64);

        let none = GrowthParams {
            recursion_rate: 50,
            branch_factor: 0,
            ..Default::default()
        };
        assert_eq!(growth(none).worst_case_segments(), 1);

        let huge = GrowthParams {
            recursion_rate: 200,
            branch_factor: 10,
            ..Default::default()
        };
        assert_eq!(growth(huge).worst_case_segments(), u64::MAX);
    }

    #[test]
    fn test_state_tip_follows_rotation() {
        let state = BranchState {
            iteration: 0,
            center: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::from_euler(0.0, 0.0, 90.0),
            width: 1.0,
            height: 3.0,
        };
        assert!(state.tip().approx_eq(&Vec3::new(-3.0, 1.0, 0.0), 0.0001));
    }
}
