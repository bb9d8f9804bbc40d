//! Frame submission: batching, merging and presentation

use glidebridge_shared::LOGO_PALETTE_INDEX;

use super::test_utils::*;
use crate::batch::{AlphaBlend, Batch, TextureCacheLocation, TextureCategory};
use crate::config::Config;
use crate::game_state::{MajorGameState, TITLE_SCREEN_TEXTURE_HASH};
use crate::glide::{GR_BLEND_ONE, GR_BLEND_ZERO};
use crate::test_utils::*;
use crate::logo;
use crate::texture::content_hash;
use crate::vertex::{GameVertex, Vertex};

#[test]
fn test_textured_fan_becomes_one_classified_batch() {
    let pixels = pattern_pixels(64 * 64, 7);
    let hash = content_hash(&pixels, 6, 0);
    let mut introspector = FakeIntrospector::default();
    introspector.categories.insert(hash, TextureCategory::Floor);

    let mut ctx = test_context_with(Config::default(), introspector);
    ctx.download_texture(0, 0, &pixels, 64, 64);
    ctx.declare_texture_source(0, 0, 64, 64, 6, 0);
    draw_fan(&mut ctx, &quad(100.0, 100.0, 32.0));

    let batches = ctx.pending_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].vertex_count, 6);
    assert_eq!(batches[0].texture_hash, hash);
    assert_eq!(batches[0].category, TextureCategory::Floor);

    ctx.on_buffer_swap();

    let backend = ctx.backend();
    assert_eq!(backend.draws.len(), 1);
    assert_eq!(backend.draws[0].batch.vertex_count, 6);
    assert_eq!(backend.draws[0].batch.category, TextureCategory::Floor);
    assert_eq!(backend.vertices.len(), 6);
    assert_eq!(backend.presents, 1);
    assert_eq!(backend.texture_requests, vec![(hash, 64 * 64)]);
}

#[test]
fn test_compatible_lines_merge_into_one_draw() {
    let mut ctx = test_context();
    let a = GameVertex::new(10.0, 10.0, 0xffff_ffff, 0.0, 0.0);
    let b = GameVertex::new(50.0, 30.0, 0xffff_ffff, 0.0, 0.0);

    ctx.draw_line(&a, &b);
    ctx.draw_line(&b, &a);
    assert_eq!(ctx.pending_batches().len(), 2);

    ctx.on_buffer_swap();
    assert_eq!(ctx.backend().draws.len(), 1);
    assert_eq!(ctx.backend().draws[0].batch.vertex_count, 12);
    assert_eq!(ctx.last_draw_calls(), 1);
}

#[test]
fn test_blend_change_splits_draws() {
    let mut ctx = test_context();
    let a = GameVertex::new(10.0, 10.0, 0xffff_ffff, 0.0, 0.0);
    let b = GameVertex::new(50.0, 30.0, 0xffff_ffff, 0.0, 0.0);

    ctx.draw_line(&a, &b);
    ctx.draw_line(&a, &b);
    ctx.set_alpha_blend(GR_BLEND_ONE, GR_BLEND_ONE, GR_BLEND_ZERO, GR_BLEND_ZERO);
    ctx.draw_line(&a, &b);
    ctx.on_buffer_swap();

    let draws = &ctx.backend().draws;
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].batch.vertex_count, 12);
    assert_eq!(draws[0].batch.alpha_blend, AlphaBlend::Opaque);
    assert_eq!(draws[1].batch.vertex_count, 6);
    assert_eq!(draws[1].batch.alpha_blend, AlphaBlend::Additive);
}

#[test]
fn test_submitted_vertices_sum_per_call_contributions() {
    let mut ctx = test_context();
    source_texture(&mut ctx, 0, 1);

    let p = GameVertex::new(5.0, 5.0, 0, 0.0, 0.0);
    let q = GameVertex::new(25.0, 5.0, 0, 0.0, 0.0);
    let five: Vec<GameVertex> = (0..5)
        .map(|i| GameVertex::new(i as f32 * 10.0, 0.0, 0, 0.0, 0.0))
        .collect();
    let packed = quad(200.0, 200.0, 16.0);

    ctx.draw_point(&p); // 3
    ctx.draw_line(&p, &q); // 6
    draw_fan(&mut ctx, &five); // 9
    draw_strip(&mut ctx, &five[..4]); // 6
    ctx.draw_vertex_array_contiguous(
        crate::glide::GR_TRIANGLE_FAN,
        4,
        bytemuck::cast_slice(&packed),
        crate::vertex::GAME_VERTEX_STRIDE,
        0,
    ); // 6
    ctx.set_weather_particle(Some(3));
    ctx.draw_line(&p, &q); // 12
    ctx.set_weather_particle(None);

    assert_eq!(ctx.pending_vertices().len(), 42);
    ctx.on_buffer_swap();
    assert_eq!(ctx.backend().vertices.len(), 42);
    assert_eq!(ctx.backend().drawn_vertex_count(), 42);
}

#[test]
fn test_missing_texture_drops_draw() {
    let mut ctx = test_context();
    source_texture(&mut ctx, 0, 3);
    let hash = ctx.scratch_batch().texture_hash;
    ctx.backend_mut().missing_textures.insert(hash);

    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));
    assert!(ctx.pending_batches().is_empty());

    ctx.on_buffer_swap();
    assert!(ctx.backend().draws.is_empty());
    assert_eq!(ctx.backend().presents, 1);
}

#[test]
fn test_swap_resets_frame() {
    let mut ctx = test_context();
    source_texture(&mut ctx, 0, 4);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));
    ctx.on_buffer_swap();

    assert_eq!(ctx.frame(), 1);
    assert!(ctx.pending_batches().is_empty());
    assert!(ctx.pending_vertices().is_empty());

    ctx.on_buffer_swap();
    assert_eq!(ctx.frame(), 2);
    assert_eq!(ctx.backend().draws.len(), 1);
    assert_eq!(ctx.backend().presents, 2);
}

#[test]
fn test_empty_frames_before_content_are_intro() {
    let mut ctx = test_context();
    ctx.on_buffer_swap();
    assert_eq!(ctx.major_game_state(), MajorGameState::FmvIntro);

    source_texture(&mut ctx, 0, 5);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));
    ctx.on_buffer_swap();
    assert_eq!(ctx.major_game_state(), MajorGameState::Menus);
}

#[test]
fn test_in_game_attaches_late_hooks_once() {
    let mut ctx = test_context();
    enter_game(&mut ctx);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));
    ctx.on_buffer_swap();
    assert_eq!(ctx.introspector().late_hooks_attached, 1);
}

// ============================================================================
// Title screen logo
// ============================================================================

#[test]
fn test_no_logo_outside_title_screen() {
    let mut ctx = test_context();
    source_texture(&mut ctx, 0, 6);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));
    ctx.on_buffer_swap();

    assert_eq!(ctx.major_game_state(), MajorGameState::Menus);
    assert!(ctx.backend().palettes.iter().all(|(i, _)| *i != LOGO_PALETTE_INDEX));
    assert!(ctx
        .backend()
        .draws
        .iter()
        .all(|d| d.batch.category != TextureCategory::TitleScreen));
}

/// Record the title artwork as a resident batch whose first vertex sits at `y`
fn record_title_artwork(ctx: &mut TestContext, y: f32) {
    let batch = Batch {
        texture_hash: TITLE_SCREEN_TEXTURE_HASH,
        texture_width: 256,
        texture_height: 256,
        location: Some(TextureCacheLocation { atlas: 1, index: 0 }),
        ..Default::default()
    };
    let v = |x: f32, y: f32| Vertex::new(x, y, 0, 0, 0xffff_ffff, false, 0, 0);
    ctx.push_raw_batch(batch, &[v(0.0, y), v(256.0, y), v(256.0, y + 40.0)]);
}

#[test]
fn test_logo_drawn_on_title_screen() {
    let mut ctx = test_context();
    record_title_artwork(&mut ctx, 550.0);
    ctx.on_buffer_swap();

    assert_eq!(ctx.major_game_state(), MajorGameState::TitleScreen);

    let backend = ctx.backend();
    let logo_hash = logo::logo_batch().texture_hash;
    assert!(backend
        .texture_requests
        .contains(&(logo_hash, glidebridge_shared::SIDE_TMU_MEMORY_SIZE)));
    assert_eq!(
        backend.palettes.iter().filter(|(i, _)| *i == LOGO_PALETTE_INDEX).count(),
        1
    );
    assert_eq!(backend.palettes[0].1, logo::logo_palette());

    assert_eq!(backend.draws.len(), 2);
    let logo_draw = &backend.draws[1].batch;
    assert_eq!(logo_draw.category, TextureCategory::TitleScreen);
    assert_eq!(logo_draw.texture_hash, logo_hash);
    assert_eq!(logo_draw.palette_index, LOGO_PALETTE_INDEX as u16);
    assert_eq!(logo_draw.vertex_count, 6);
    assert_eq!(backend.vertices.len(), 9);
}

#[test]
fn test_logo_palette_uploaded_once() {
    let mut ctx = test_context();
    for _ in 0..3 {
        record_title_artwork(&mut ctx, 560.0);
        ctx.on_buffer_swap();
    }

    let backend = ctx.backend();
    assert_eq!(backend.palettes.len(), 1);
    assert_eq!(backend.draws.len(), 6);
}

#[test]
fn test_no_logo_above_title_artwork_line() {
    let mut ctx = test_context();
    record_title_artwork(&mut ctx, 549.0);
    ctx.on_buffer_swap();

    assert_eq!(ctx.major_game_state(), MajorGameState::Menus);
    let backend = ctx.backend();
    assert!(backend.palettes.is_empty());
    assert_eq!(backend.draws.len(), 1);
    assert_eq!(backend.draws[0].batch.texture_hash, TITLE_SCREEN_TEXTURE_HASH);
}

#[test]
fn test_no_logo_when_disabled() {
    let mut config = Config::default();
    config.render.logo = false;
    let mut ctx = test_context_with(config, FakeIntrospector::default());
    record_title_artwork(&mut ctx, 580.0);
    ctx.on_buffer_swap();

    assert_eq!(ctx.major_game_state(), MajorGameState::TitleScreen);
    assert_eq!(ctx.backend().draws.len(), 1);
}

// ============================================================================
// Capacity
// ============================================================================

fn tiny_context() -> TestContext {
    let mut limits = test_limits();
    limits.max_vertices = 8;
    let mut ctx = crate::context::GlideContext::with_limits(
        RecordingBackend::default(),
        FakeIntrospector::default(),
        Config::default(),
        limits,
    );
    ctx.on_window_open(800, 600);
    ctx
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "capacity exceeded"))]
fn test_vertex_overflow_drops_whole_draw() {
    let mut ctx = tiny_context();
    source_texture(&mut ctx, 0, 8);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));

    assert_eq!(ctx.pending_batches().len(), 1);
    assert_eq!(ctx.pending_vertices().len(), 6);

    ctx.on_buffer_swap();
    assert_eq!(ctx.backend().drawn_vertex_count(), 6);
}
