//! Input Adapter (spec §4.7): turns raw `InputEvent`s and landmark frames
//! into pointer operations and the splats those operations trigger each
//! step. Lives in `fluidsim-core` (not `fluid-api`) because it drives the
//! splat program directly; `fluid-api` only defines the event/landmark wire
//! types it consumes.

use std::collections::HashSet;

use fluid_api::{Color, HandLandmarks, InputEvent, KeyCode, LandmarkFrame, PointerId, SimConfig};
use rand::Rng;

use crate::pipeline::splat::{aspect_corrected_radius, SplatKernel};
use crate::pointer::PointerTracker;
use crate::resources::SimTextures;

/// Multiplies the configured splat radius for the one-shot splat fired on
/// pointer-down, which should read as a smaller tap than the continuous
/// drag splats (spec §4.7).
const DOWN_SPLAT_RADIUS_MULTIPLIER: f32 = 0.7;

/// Scales freshly generated HSV colors down so dye accumulation doesn't blow
/// out to solid white after a few splats (spec §4.6 "near-saturated,
/// near-full-value, then scaled down").
const SPLAT_COLOR_SCALE: f32 = 0.15;

/// Pointer ids in this range are minted by the landmark-driven adapter, one
/// per tracked hand slot, disjoint from mouse (id `0`) and touch ids.
const LANDMARK_POINTER_BASE: PointerId = 1 << 32;

fn generate_splat_color(rng: &mut impl Rng) -> Color {
    let c = Color::from_hsv(rng.gen_range(0.0..1.0), 1.0, 1.0);
    Color::new(c.r * SPLAT_COLOR_SCALE, c.g * SPLAT_COLOR_SCALE, c.b * SPLAT_COLOR_SCALE)
}

/// Default pointer color source: bright, fully saturated, random hue (spec
/// §4.6). `PointerTracker` takes a bare `fn() -> Color`, so this can't be a
/// capturing closure.
fn random_bright_color() -> Color {
    Color::from_hsv(rand::thread_rng().gen_range(0.0..1.0), 1.0, 1.0)
}

struct PendingSplat {
    point: (f32, f32),
    velocity: (f32, f32),
    color: Color,
    radius: f32,
}

/// Converts mouse/touch/landmark input into pointer state transitions and
/// splats. One instance per `Simulator`.
pub struct InputAdapter {
    pointers: PointerTracker,
    pending: Vec<PendingSplat>,
    /// Random-burst counts queued by `KeyCode::RandomSplats`; one count is
    /// popped and emitted per `update()` call (spec §4.7).
    splat_stack: Vec<u32>,
    color_timer: f32,
    landmark_active: HashSet<PointerId>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self {
            pointers: PointerTracker::new(random_bright_color),
            pending: Vec::new(),
            splat_stack: Vec::new(),
            color_timer: 0.0,
            landmark_active: HashSet::new(),
        }
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.active_count()
    }

    /// Applies one push-style input event. `config` is mutated directly for
    /// the two illustrative keyboard commands (spec §6); everything else
    /// only touches the pointer registry.
    pub fn handle_event(&mut self, event: InputEvent, config: &mut SimConfig, surface_width: u32, surface_height: u32) {
        match event {
            InputEvent::PointerDown { id, x, y } => {
                self.pointers.down(id, x, y, surface_width, surface_height);
                if let Some(p) = self.pointers.get(id) {
                    let aspect_ratio = surface_width.max(1) as f32 / surface_height.max(1) as f32;
                    self.pending.push(PendingSplat {
                        point: (p.x, p.y),
                        velocity: (0.0, 0.0),
                        color: p.color,
                        radius: aspect_corrected_radius(config.splat_radius * DOWN_SPLAT_RADIUS_MULTIPLIER, aspect_ratio),
                    });
                }
            }
            InputEvent::PointerMove { id, x, y } => {
                self.pointers.moved(id, x, y, surface_width, surface_height);
            }
            InputEvent::PointerUp { id } => self.pointers.up(id),
            InputEvent::PointerCancel { id } => self.pointers.cancel(id),
            InputEvent::Key { code } => match code {
                KeyCode::TogglePause => config.paused = !config.paused,
                KeyCode::RandomSplats => {
                    let mut rng = rand::thread_rng();
                    self.splat_stack.push(rng.gen_range(5..=24));
                }
                KeyCode::Other(_) => {}
            },
        }
    }

    /// Feeds one frame of hand-landmark detections (spec §4.7). Each hand
    /// slot gets a stable synthetic pointer id; an open hand drives that
    /// pointer like a mouse drag, a closed or absent hand removes it.
    pub fn handle_landmarks(&mut self, frame: &LandmarkFrame, surface_width: u32, surface_height: u32) {
        let mut seen = HashSet::new();
        for (index, hand) in frame.iter().enumerate() {
            let id = LANDMARK_POINTER_BASE + index as PointerId;
            if hand.is_open {
                seen.insert(id);
                let (nx, ny) = hand.index_tip();
                let px = nx * surface_width.max(1) as f32;
                let py = ny * surface_height.max(1) as f32;
                if self.landmark_active.contains(&id) {
                    self.pointers.moved(id, px, py, surface_width, surface_height);
                } else {
                    self.pointers.down(id, px, py, surface_width, surface_height);
                    self.landmark_active.insert(id);
                }
            }
        }
        let closed: Vec<PointerId> = self.landmark_active.difference(&seen).copied().collect();
        for id in closed {
            self.pointers.cancel(id);
            self.landmark_active.remove(&id);
        }
    }

    /// Convenience used by hosts that only want to forward one
    /// already-classified hand, without building a full `LandmarkFrame` —
    /// forwards straight to `handle_landmarks`.
    pub fn handle_single_hand(&mut self, hand: &HandLandmarks, surface_width: u32, surface_height: u32) {
        self.handle_landmarks(std::slice::from_ref(hand), surface_width, surface_height);
    }

    /// Advances the pointer color-refresh timer (spec §4.6); crossing `1.0`
    /// re-randomizes every active pointer's color and keeps the fractional
    /// remainder.
    fn tick_color_refresh(&mut self, dt: f32, config: &SimConfig) {
        self.color_timer += dt * config.color_update_speed;
        if self.color_timer >= 1.0 {
            self.color_timer %= 1.0;
            if config.colorful {
                self.pointers.refresh_all_colors();
            }
        }
    }

    /// Emits this frame's splats: queued one-shot down-splats, one splat per
    /// moved pointer, and one random burst if the stack is non-empty.
    /// `dt` is only consumed by the color-refresh timer.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        splat_kernel: &SplatKernel,
        textures: &mut SimTextures,
        config: &SimConfig,
        aspect_ratio: f32,
        dt: f32,
    ) {
        self.tick_color_refresh(dt, config);

        let pending = std::mem::take(&mut self.pending);
        for splat in pending {
            emit_splat(device, queue, encoder, splat_kernel, textures, splat.point, splat.velocity, splat.color, splat.radius);
        }

        let radius = aspect_corrected_radius(config.splat_radius, aspect_ratio);
        for p in self.pointers.drain_moved() {
            let velocity = (p.dx * config.splat_force, p.dy * config.splat_force);
            emit_splat(device, queue, encoder, splat_kernel, textures, (p.x, p.y), velocity, p.color, radius);
        }

        if let Some(count) = self.splat_stack.pop() {
            let mut rng = rand::thread_rng();
            for _ in 0..count {
                let point = (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
                let force = config.splat_force * rng.gen_range(-1.0..1.0);
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let velocity = (angle.cos() * force, angle.sin() * force);
                let color = generate_splat_color(&mut rng);
                emit_splat(device, queue, encoder, splat_kernel, textures, point, velocity, color, radius);
            }
        }
    }
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws one splat into both the velocity and dye ping-pong pairs and swaps
/// each, so a second splat emitted in the same frame reads the first's
/// result (spec §4.7, §5 strict program order within one encoder).
#[allow(clippy::too_many_arguments)]
fn emit_splat(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    encoder: &mut wgpu::CommandEncoder,
    splat_kernel: &SplatKernel,
    textures: &mut SimTextures,
    point: (f32, f32),
    velocity: (f32, f32),
    color: Color,
    radius: f32,
) {
    splat_kernel.splat_velocity(
        device,
        queue,
        encoder,
        &textures.velocity.read.view,
        &textures.velocity.write.view,
        [point.0, point.1],
        [velocity.0, velocity.1],
        radius,
    );
    textures.velocity.swap();

    splat_kernel.splat_dye(
        device,
        queue,
        encoder,
        &textures.dye.read.view,
        &textures.dye.write.view,
        [point.0, point.1],
        color.to_array(),
        radius,
    );
    textures.dye.swap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_down_queues_one_pending_splat() {
        let mut adapter = InputAdapter::new();
        let mut config = SimConfig::default();
        adapter.handle_event(InputEvent::PointerDown { id: 1, x: 50.0, y: 50.0 }, &mut config, 100, 100);
        assert_eq!(adapter.pending.len(), 1);
        assert_eq!(adapter.pointer_count(), 1);
    }

    #[test]
    fn toggle_pause_key_flips_config() {
        let mut adapter = InputAdapter::new();
        let mut config = SimConfig::default();
        assert!(!config.paused);
        adapter.handle_event(InputEvent::Key { code: KeyCode::TogglePause }, &mut config, 100, 100);
        assert!(config.paused);
    }

    #[test]
    fn random_splats_key_pushes_stack_entry_in_range() {
        let mut adapter = InputAdapter::new();
        let mut config = SimConfig::default();
        adapter.handle_event(InputEvent::Key { code: KeyCode::RandomSplats }, &mut config, 100, 100);
        assert_eq!(adapter.splat_stack.len(), 1);
        assert!(adapter.splat_stack[0] >= 5 && adapter.splat_stack[0] <= 24);
    }

    #[test]
    fn landmark_open_then_close_removes_synthetic_pointer() {
        let mut adapter = InputAdapter::new();
        let open_hand = HandLandmarks { landmarks: [(0.5, 0.5); fluid_api::LANDMARK_COUNT], is_open: true };
        adapter.handle_landmarks(&vec![open_hand], 100, 100);
        assert_eq!(adapter.pointer_count(), 1);
        let closed_hand = HandLandmarks { landmarks: [(0.5, 0.5); fluid_api::LANDMARK_COUNT], is_open: false };
        adapter.handle_landmarks(&vec![closed_hand], 100, 100);
        assert_eq!(adapter.pointer_count(), 0);
    }
}
