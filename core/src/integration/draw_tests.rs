//! Vertex expansion and batch state capture per draw type

use glidebridge_shared::{OffsetF, SURFACE_ID_USER_INTERFACE, WHITE_PALETTE_INDEX};

use super::test_utils::*;
use crate::batch::{GameAddress, TextureCategory};
use crate::config::Config;
use crate::glide::{
    GR_COMBINE_FACTOR_ZERO, GR_COMBINE_FUNCTION_LOCAL, GR_COMBINE_LOCAL_CONSTANT,
    GR_COMBINE_OTHER_CONSTANT, GR_TRIANGLE_FAN,
};
use crate::test_utils::*;
use crate::vertex::{GAME_VERTEX_STRIDE, GameVertex};

fn positions(ctx: &TestContext) -> Vec<OffsetF> {
    ctx.pending_vertices().iter().map(|v| v.position()).collect()
}

#[test]
fn test_point_expands_to_pixel_triangle() {
    let mut ctx = test_context();
    ctx.draw_point(&GameVertex::new(5.0, 5.0, 0, 0.0, 0.0));

    assert_eq!(
        positions(&ctx),
        [
            OffsetF::new(5.0, 5.0),
            OffsetF::new(6.0, 5.0),
            OffsetF::new(6.0, 6.0)
        ]
    );
    assert_eq!(ctx.pending_batches()[0].game_address, GameAddress::Unknown);
}

#[test]
fn test_line_expands_to_thin_quad() {
    let mut ctx = test_context();
    let from = GameVertex::new(0.0, 0.0, 0xff00_00ff, 0.0, 0.0);
    let to = GameVertex::new(10.0, 0.0, 0xff00_ff00, 0.0, 0.0);
    ctx.draw_line(&from, &to);

    let v0 = OffsetF::new(10.0, -0.5);
    let v1 = OffsetF::new(0.0, -0.5);
    let v2 = OffsetF::new(10.0, 0.5);
    let v3 = OffsetF::new(0.0, 0.5);
    assert_eq!(positions(&ctx), [v0, v1, v2, v1, v3, v2]);

    let batch = ctx.pending_batches()[0];
    assert_eq!(batch.game_address, GameAddress::DrawLine);
    assert_eq!(batch.category, TextureCategory::UserInterface);
    assert_eq!(batch.palette_index, WHITE_PALETTE_INDEX as u16);

    for v in ctx.pending_vertices() {
        assert_eq!(v.surface_id, SURFACE_ID_USER_INTERFACE);
        assert_eq!(v.palette_index(), WHITE_PALETTE_INDEX as u16);
        // Color comes from the end point
        assert_eq!(v.color & 0x00ff_ffff, 0x0000_ff00);
    }
}

#[test]
fn test_line_leaves_scratch_palette_alone() {
    let mut ctx = test_context();
    ctx.download_palette_table(crate::glide::GR_TEXTABLE_PALETTE, &test_palette(1));
    let bound = ctx.scratch_batch().palette_index;

    let a = GameVertex::new(0.0, 0.0, 0, 0.0, 0.0);
    ctx.draw_line(&a, &a);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 4.0));

    assert_eq!(ctx.scratch_batch().palette_index, bound);
    let fan_vertex = ctx.pending_vertices()[6];
    assert_eq!(fan_vertex.palette_index(), bound);
}

#[test]
fn test_weather_line_becomes_streak() {
    let mut ctx = test_context();
    ctx.set_weather_particle(Some(7));
    let from = GameVertex::new(100.0, 100.0, 0xff12_3456, 0.0, 0.0);
    let to = GameVertex::new(104.0, 108.0, 0xff12_3456, 0.0, 0.0);
    ctx.draw_line(&from, &to);

    let vertices = ctx.pending_vertices();
    assert_eq!(vertices.len(), 12);
    let transparent = vertices.iter().filter(|v| v.color >> 24 == 0).count();
    assert_eq!(transparent, 8);
    assert!(vertices.iter().all(|v| v.color & 0x00ff_ffff == 0x0012_3456));
    assert_eq!(ctx.weather_predictor().active_count(), 1);
}

#[test]
fn test_weather_line_without_prediction_is_plain() {
    let mut config = Config::default();
    config.motion.enabled = false;
    let mut ctx = test_context_with(config, FakeIntrospector::default());
    ctx.set_weather_particle(Some(7));

    let a = GameVertex::new(0.0, 0.0, 0, 0.0, 0.0);
    let b = GameVertex::new(3.0, 4.0, 0, 0.0, 0.0);
    ctx.draw_line(&a, &b);
    assert_eq!(ctx.pending_vertices().len(), 6);
}

#[test]
fn test_call_site_refines_category() {
    let mut introspector = FakeIntrospector::default();
    introspector.call_sites.insert(0x40, GameAddress::DrawFloor);
    introspector
        .call_site_categories
        .insert(GameAddress::DrawFloor, TextureCategory::Floor);
    let mut ctx = test_context_with(Config::default(), introspector);

    ctx.draw_vertex_array(GR_TRIANGLE_FAN, &quad(0.0, 0.0, 8.0), 0x40);
    ctx.draw_vertex_array(GR_TRIANGLE_FAN, &quad(0.0, 0.0, 8.0), 0x41);

    let batches = ctx.pending_batches();
    assert_eq!(batches[0].game_address, GameAddress::DrawFloor);
    assert_eq!(batches[0].category, TextureCategory::Floor);
    assert_eq!(batches[1].game_address, GameAddress::Unknown);
    assert_eq!(batches[1].category, TextureCategory::Unknown);
}

#[test]
fn test_invalid_vertex_arrays_are_dropped() {
    let mut ctx = test_context();
    let q = quad(0.0, 0.0, 8.0);

    ctx.draw_vertex_array(3, &q, 0);
    ctx.draw_vertex_array(GR_TRIANGLE_FAN, &q[..2], 0);
    ctx.draw_vertex_array_contiguous(GR_TRIANGLE_FAN, 4, &[0; 128], 32, 0);

    assert!(ctx.pending_batches().is_empty());
    assert!(ctx.pending_vertices().is_empty());
}

#[test]
fn test_contiguous_fan_matches_indexed_fan() {
    let q = quad(20.0, 30.0, 16.0);

    let mut indexed = test_context();
    draw_fan(&mut indexed, &q);

    let mut contiguous = test_context();
    contiguous.draw_vertex_array_contiguous(GR_TRIANGLE_FAN, 4, bytemuck::cast_slice(&q), GAME_VERTEX_STRIDE, 0);

    assert_eq!(indexed.pending_vertices(), contiguous.pending_vertices());
}

#[test]
fn test_constant_color_combine_ignores_vertex_color() {
    let mut ctx = test_context();
    ctx.set_color_combine(
        GR_COMBINE_FUNCTION_LOCAL,
        GR_COMBINE_FACTOR_ZERO,
        GR_COMBINE_LOCAL_CONSTANT,
        GR_COMBINE_OTHER_CONSTANT,
    );
    ctx.set_constant_color(0x1122_3344);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));

    for v in ctx.pending_vertices() {
        assert_eq!(v.color, 0xff11_2233);
        assert_eq!(v.palette_index(), WHITE_PALETTE_INDEX as u16);
    }
}

#[test]
fn test_texcoords_follow_texture_size() {
    let mut ctx = test_context();
    source_texture(&mut ctx, 0, 2);
    draw_fan(&mut ctx, &quad(0.0, 0.0, 8.0));

    // 64 texels: shift by 2
    let v = ctx.pending_vertices()[2];
    assert_eq!((v.s, v.t), (63, 63));
}

#[test]
fn test_world_tiles_share_surface_in_game() {
    let mut introspector = FakeIntrospector::default();
    introspector.call_sites.insert(0x40, GameAddress::DrawFloor);
    let mut ctx = test_context_with(Config::default(), introspector);
    enter_game(&mut ctx);

    ctx.draw_vertex_array(GR_TRIANGLE_FAN, &quad(10.0, 10.0, 8.0), 0x40);
    ctx.draw_vertex_array(GR_TRIANGLE_FAN, &quad(20.0, 10.0, 8.0), 0x40);
    ctx.draw_vertex_array(GR_TRIANGLE_FAN, &quad(30.0, 10.0, 8.0), 0);

    let ids: Vec<u16> = ctx.pending_vertices().iter().map(|v| v.surface_id).collect();
    assert_eq!(ids[0], ids[6]);
    assert_ne!(ids[6], ids[12]);
    assert!(ids.iter().all(|&id| id != SURFACE_ID_USER_INTERFACE));
}

#[test]
fn test_draws_outside_game_area_are_interface() {
    let mut ctx = test_context();
    enter_game(&mut ctx);

    draw_fan(&mut ctx, &quad(900.0, 10.0, 8.0));
    assert!(ctx
        .pending_vertices()
        .iter()
        .all(|v| v.surface_id == SURFACE_ID_USER_INTERFACE));
}
