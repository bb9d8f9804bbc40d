//! End-to-end tests driving [`GlideContext`](crate::context::GlideContext)
//! through the intercepted call surface with recording collaborators.

#[cfg(test)]
mod draw_tests;
#[cfg(test)]
mod frame_tests;

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::glide::{GR_TRIANGLE_FAN, GR_TRIANGLE_STRIP};
    use crate::test_utils::{TestContext, pattern_pixels};
    use crate::vertex::GameVertex;

    pub const TEXTURE_SIZE: u32 = 64;

    /// Axis-aligned quad as four fan vertices
    pub fn quad(x: f32, y: f32, size: f32) -> [GameVertex; 4] {
        [
            GameVertex::new(x, y, 0xff80_8080, 0.0, 0.0),
            GameVertex::new(x + size, y, 0xff80_8080, 255.0, 0.0),
            GameVertex::new(x + size, y + size, 0xff80_8080, 255.0, 255.0),
            GameVertex::new(x, y + size, 0xff80_8080, 0.0, 255.0),
        ]
    }

    /// Download and source a 64x64 texture at `address`, returning its pixels
    pub fn source_texture(ctx: &mut TestContext, address: u32, seed: u8) -> Vec<u8> {
        let pixels = pattern_pixels((TEXTURE_SIZE * TEXTURE_SIZE) as usize, seed);
        ctx.download_texture(0, address, &pixels, TEXTURE_SIZE, TEXTURE_SIZE);
        ctx.declare_texture_source(0, address, TEXTURE_SIZE, TEXTURE_SIZE, 6, 0);
        pixels
    }

    pub fn draw_fan(ctx: &mut TestContext, vertices: &[GameVertex]) {
        ctx.draw_vertex_array(GR_TRIANGLE_FAN, vertices, 0);
    }

    pub fn draw_strip(ctx: &mut TestContext, vertices: &[GameVertex]) {
        ctx.draw_vertex_array(GR_TRIANGLE_STRIP, vertices, 0);
    }

    /// Present frames until the classifier reports gameplay
    pub fn enter_game(ctx: &mut TestContext) {
        ctx.introspector_mut().in_game = true;
        draw_fan(ctx, &quad(10.0, 10.0, 8.0));
        ctx.on_buffer_swap();
        assert_eq!(ctx.major_game_state(), crate::game_state::MajorGameState::InGame);
    }
}
