//! Interactive viewer for the rasterizer
//!
//! Plays the roles the pipeline leaves to its collaborators: builds a
//! palette, a test texture, a translucency table and a small mesh, orbits the
//! camera, and blits the paletted framebuffer to the window.
//!
//! Keys: Space toggles the fixed/float back-end, C toggles near-plane
//! clipping, T toggles the translucent cube.

use log::{info, warn};
use macroquad::prelude::*;
use serde::Deserialize;
use softpoly::math::Vec2 as Uv;
use softpoly::math::Vec4;
use softpoly::{
    CameraPose, Framebuffer, RasterBackend, RenderContext, Texture as PalTexture,
    TranslucencyTable, Triangle, Vertex, TRANSPARENT_INDEX,
};

const RENDER_WIDTH: i32 = 320;
const RENDER_HEIGHT: i32 = 200;
const BACKGROUND: u8 = 2; // dark blue cube entry

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    width: i32,
    height: i32,
    backend: RasterBackend,
    near_clip: bool,
    orbit_radius: f32,
    orbit_height: f32,
    texture_path: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: RENDER_WIDTH,
            height: RENDER_HEIGHT,
            backend: RasterBackend::Float,
            near_clip: false,
            orbit_radius: 260.0,
            orbit_height: 140.0,
            texture_path: None,
        }
    }
}

fn load_config() -> DemoConfig {
    match std::fs::read_to_string("assets/demo.ron") {
        Ok(text) => match ron::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("assets/demo.ron is invalid ({e}), using defaults");
                DemoConfig::default()
            }
        },
        Err(_) => {
            warn!("assets/demo.ron not found, using defaults");
            DemoConfig::default()
        }
    }
}

/// 6x6x6 color cube followed by a grayscale ramp. Index 255 stays reserved
/// as the transparency sentinel.
fn build_palette() -> [[u8; 3]; 256] {
    let mut palette = [[0u8; 3]; 256];
    for r in 0..6 {
        for g in 0..6 {
            for b in 0..6 {
                palette[r * 36 + g * 6 + b] = [(r * 51) as u8, (g * 51) as u8, (b * 51) as u8];
            }
        }
    }
    for i in 0..32 {
        palette[216 + i] = [(i * 8) as u8; 3];
    }
    palette
}

fn nearest_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |c: u8| (c as u32 * 5 + 127) / 255;
    (level(r) * 36 + level(g) * 6 + level(b)) as u8
}

/// 50/50 blend of every (source, destination) pair, requantized to the cube.
fn build_transmap(palette: &[[u8; 3]; 256]) -> TranslucencyTable {
    let mut table = vec![0u8; 65536].into_boxed_slice();
    for s in 0..256 {
        for d in 0..256 {
            let sc = palette[s];
            let dc = palette[d];
            table[(s << 8) | d] = nearest_index(
                ((sc[0] as u16 + dc[0] as u16) / 2) as u8,
                ((sc[1] as u16 + dc[1] as u16) / 2) as u8,
                ((sc[2] as u16 + dc[2] as u16) / 2) as u8,
            );
        }
    }
    let table: Box<[u8; 65536]> = table.try_into().expect("table is 65536 bytes");
    TranslucencyTable::new(table)
}

/// Checkerboard with a sentinel hole in one corner of each cell.
fn build_checkerboard() -> PalTexture {
    let size = 64u32;
    let mut data = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let cell = ((x / 8) + (y / 8)) % 2 == 0;
            let hole = x % 8 == 0 && y % 8 == 0;
            data.push(if hole {
                TRANSPARENT_INDEX
            } else if cell {
                nearest_index(230, 90, 40)
            } else {
                nearest_index(240, 220, 180)
            });
        }
    }
    PalTexture::new(size, size, data).expect("checkerboard dimensions")
}

fn load_texture(config: &DemoConfig) -> PalTexture {
    let Some(path) = &config.texture_path else {
        return build_checkerboard();
    };
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            let data = rgba
                .pixels()
                .map(|p| {
                    if p[3] < 128 {
                        TRANSPARENT_INDEX
                    } else {
                        nearest_index(p[0], p[1], p[2])
                    }
                })
                .collect();
            PalTexture::new(w, h, data).expect("decoded image dimensions")
        }
        Err(e) => {
            warn!("could not load {path}: {e}, using checkerboard");
            build_checkerboard()
        }
    }
}

/// Scene space uses x/y for the ground and z up; the pipeline wants
/// (x, -z, -y).
fn scene_point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, -z, -y)
}

struct SceneTri {
    positions: [[f32; 3]; 3],
    uvs: [[f32; 2]; 3],
}

fn quad(tris: &mut Vec<SceneTri>, corners: [[f32; 3]; 4], uv_scale: f32) {
    let uv = [[0.0, 0.0], [uv_scale, 0.0], [uv_scale, uv_scale], [0.0, uv_scale]];
    tris.push(SceneTri {
        positions: [corners[0], corners[2], corners[1]],
        uvs: [uv[0], uv[2], uv[1]],
    });
    tris.push(SceneTri {
        positions: [corners[0], corners[3], corners[2]],
        uvs: [uv[0], uv[3], uv[2]],
    });
}

fn build_scene() -> (Vec<SceneTri>, Vec<SceneTri>) {
    let mut floor = Vec::new();
    quad(
        &mut floor,
        [
            [-200.0, -200.0, 0.0],
            [200.0, -200.0, 0.0],
            [200.0, 200.0, 0.0],
            [-200.0, 200.0, 0.0],
        ],
        64.0,
    );

    let mut cube = Vec::new();
    let s = 60.0;
    let (lo, hi) = (20.0, 20.0 + 2.0 * s);
    // four sides plus top, in scene coordinates
    quad(&mut cube, [[-s, -s, lo], [s, -s, lo], [s, -s, hi], [-s, -s, hi]], 64.0);
    quad(&mut cube, [[s, -s, lo], [s, s, lo], [s, s, hi], [s, -s, hi]], 64.0);
    quad(&mut cube, [[s, s, lo], [-s, s, lo], [-s, s, hi], [s, s, hi]], 64.0);
    quad(&mut cube, [[-s, s, lo], [-s, -s, lo], [-s, -s, hi], [-s, s, hi]], 64.0);
    quad(&mut cube, [[-s, -s, hi], [s, -s, hi], [s, s, hi], [-s, s, hi]], 64.0);
    (floor, cube)
}

fn blit(fb: &Framebuffer, palette: &[[u8; 3]; 256]) -> Texture2D {
    let mut rgba = Vec::with_capacity(fb.data().len() * 4);
    for &index in fb.data() {
        let [r, g, b] = palette[index as usize];
        rgba.extend_from_slice(&[r, g, b, 255]);
    }
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &rgba);
    texture.set_filter(FilterMode::Nearest);
    texture
}

#[macroquad::main("softpoly demo")]
async fn main() {
    env_logger::init();
    let config = load_config();
    info!("render target {}x{}", config.width, config.height);

    let palette = build_palette();
    let transmap = build_transmap(&palette);
    let texture = load_texture(&config);

    let mut ctx = RenderContext::new(config.width, config.height);
    ctx.options.backend = config.backend;
    ctx.options.near_clip = config.near_clip;

    let mut fb = Framebuffer::new(config.width, config.height);
    let (floor, cube) = build_scene();
    let mut translucent_cube = false;

    loop {
        if is_key_pressed(KeyCode::Space) {
            ctx.options.backend = match ctx.options.backend {
                RasterBackend::Fixed => RasterBackend::Float,
                RasterBackend::Float => RasterBackend::Fixed,
            };
            info!("backend: {:?}", ctx.options.backend);
        }
        if is_key_pressed(KeyCode::C) {
            ctx.options.near_clip = !ctx.options.near_clip;
            info!("near clip: {}", ctx.options.near_clip);
        }
        if is_key_pressed(KeyCode::T) {
            translucent_cube = !translucent_cube;
        }

        let t = get_time() as f32 * 0.4;
        let pose = CameraPose {
            x: config.orbit_radius * t.cos(),
            y: config.orbit_radius * t.sin(),
            z: config.orbit_height,
            yaw: t + std::f32::consts::FRAC_PI_2,
            y_shear: 0,
        };

        fb.clear(BACKGROUND);
        ctx.begin_frame(pose);

        let vertices_of = |tri: &SceneTri| {
            std::array::from_fn(|i| {
                let [x, y, z] = tri.positions[i];
                let [u, v] = tri.uvs[i];
                Vertex::new(scene_point(x, y, z), Uv::new(u, v))
            })
        };
        // errors below only mean begin_frame was skipped, which it was not
        for tri in &floor {
            let triangle = Triangle::new(vertices_of(tri), &texture);
            let _ = ctx.transform_triangle(&mut fb, &triangle);
        }
        for tri in &cube {
            let mut triangle = Triangle::new(vertices_of(tri), &texture);
            if translucent_cube {
                triangle = triangle.with_transmap(&transmap);
            }
            let _ = ctx.transform_triangle(&mut fb, &triangle);
        }

        let texture2d = blit(&fb, &palette);
        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        draw_texture_ex(
            &texture2d,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(fb.width as f32 * scale, fb.height as f32 * scale)),
                ..Default::default()
            },
        );
        draw_text(
            &format!("{:?} / clip {} / [space] [c] [t]", ctx.options.backend, ctx.options.near_clip),
            10.0,
            20.0,
            20.0,
            WHITE,
        );

        next_frame().await;
    }
}
