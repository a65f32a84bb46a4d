use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::{Duration, Instant};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use scared_rs::{
    math::Fixed,
    renderer::{RendererExt, Rgba, Software, SpecialTextures},
    world::{Camera, Image, Map, Texture, TextureBank, TileKind, TileSet, parse_layout},
};

/// Walk around a procedural level with the software ray caster.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Initial window width in pixels
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Draw every surface at full brightness
    #[arg(long)]
    no_depth_shading: bool,

    /// Frame-rate cap
    #[arg(long, default_value_t = 60)]
    fps: usize,
}

const LEVEL: [&str; 12] = [
    "################",
    "#@.....#.......#",
    "#......D...*...#",
    "#......#.......#",
    "###-####...M...#",
    "#......|.......#",
    "#..*...#####2###",
    "#......#.......#",
    "#......1...*...#",
    "#......#.......#",
    "#..G...#...E...#",
    "################",
];

const TEX_BITS: u32 = 6;
const MOVE_SPEED: f32 = 2.5; // tiles / s
const TURN_SPEED: f32 = 120.0; // degrees / s
const DOOR_SPEED: f32 = 1.0; // open fraction / s
const SLIDE_SPEED: f32 = 0.4;

/*──────────────────────── procedural art ─────────────────────────*/

fn argb(r: u32, g: u32, b: u32) -> Rgba {
    0xFF00_0000 | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255)
}

fn procedural(name: &str, f: impl Fn(u32, u32) -> Rgba) -> anyhow::Result<Texture> {
    let size = 1usize << TEX_BITS;
    let pixels = (0..size * size)
        .map(|i| f((i % size) as u32, (i / size) as u32))
        .collect();
    Ok(Texture::new(name, size, pixels)?.with_mipmaps())
}

fn bricks(base: (u32, u32, u32)) -> impl Fn(u32, u32) -> Rgba {
    move |x, y| {
        let row = y / 8;
        let shift = if row % 2 == 0 { 0 } else { 8 };
        if y % 8 == 7 || (x + shift) % 16 == 15 {
            argb(70, 70, 70)
        } else {
            let n = (x * 7 + y * 13) % 24;
            argb(base.0 + n, base.1 + n / 2, base.2 + n / 3)
        }
    }
}

fn build_bank() -> anyhow::Result<TextureBank> {
    let mut bank = TextureBank::default_with_checker();

    bank.insert("WALL", procedural("WALL", bricks((150, 60, 40)))?)?;
    bank.insert("EXIT", procedural("EXIT", bricks((40, 140, 60)))?)?;
    bank.insert("GENERATOR", procedural("GENERATOR", bricks((120, 40, 160)))?)?;
    bank.insert("MOVER", procedural("MOVER", bricks((90, 90, 150)))?)?;
    bank.insert(
        "FLOOR",
        procedural("FLOOR", |x, y| {
            if (x / 16 + y / 16) % 2 == 0 {
                argb(110, 100, 80)
            } else {
                argb(80, 72, 60)
            }
        })?,
    )?;

    let door_tints = [(160, 120, 60), (60, 110, 170), (170, 60, 60), (150, 150, 60)];
    for (name, (r, g, b)) in SpecialTextures::DOOR_NAMES.iter().zip(door_tints) {
        bank.insert(
            *name,
            procedural(name, move |x, _| {
                let groove = if x % 16 == 0 { 40 } else { 0 };
                argb(r - groove, g - groove, b - groove)
            })?,
        )?;
    }
    bank.insert(
        SpecialTextures::DOOR_SIDE_NAME,
        procedural(SpecialTextures::DOOR_SIDE_NAME, |_, y| argb(90, 90, 100 + (y % 8) * 4))?,
    )?;
    bank.insert(
        SpecialTextures::WINDOW_NAME,
        procedural(SpecialTextures::WINDOW_NAME, |_, y| argb(60 + y, 60 + y, 70 + y))?,
    )?;
    bank.insert(
        "BARREL",
        procedural("BARREL", |x, y| {
            let (dx, dy) = (x as i32 - 32, y as i32 - 40);
            if dx * dx + dy * dy < 22 * 22 {
                argb(60, 120 + (y % 16) * 4, 60)
            } else {
                0 // transparent
            }
        })?,
    )?;
    Ok(bank)
}

fn sky(width: usize, height: usize) -> Image {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let ridge = height * 3 / 4 - ((x as f32 * 0.05).sin() * 6.0 + 6.0) as usize;
            let px = if y > ridge {
                argb(40, 50, 45)
            } else {
                let t = (y * 160 / height) as u32;
                argb(40 + t / 2, 70 + t / 2, 140 + t / 2)
            };
            pixels.push(px);
        }
    }
    Image::new(width, height, pixels)
}

fn build_map(bank: &TextureBank) -> anyhow::Result<Map> {
    let id = |name: &str| bank.id(name).ok_or_else(|| anyhow::anyhow!("texture {name} missing"));
    let set = TileSet {
        floor: id("FLOOR")?,
        wall: id("WALL")?,
        exit: id("EXIT")?,
        generator: id("GENERATOR")?,
        movable_wall: id("MOVER")?,
        sprite: Some(id("BARREL")?),
        sprite_scale: 1.0 / 64.0,
        eye_height: 0.5,
    };
    Ok(parse_layout(&LEVEL, &set)?)
}

/*──────────────────────── animation ─────────────────────────*/

/// Door and movable-wall cells, animated between frames.
struct Animations {
    doors: Vec<(i32, i32)>,
    movers: Vec<(i32, i32)>,
    doors_open: bool,
    slide_dir: f32,
}

impl Animations {
    fn scan(map: &Map) -> Self {
        let mut doors = Vec::new();
        let mut movers = Vec::new();
        for y in 0..map.height() as i32 {
            for x in 0..map.width() as i32 {
                match map.tile_at(x, y).map(|t| t.kind) {
                    Some(TileKind::Door { .. }) => doors.push((x, y)),
                    Some(TileKind::MovableWall { .. }) => movers.push((x, y)),
                    _ => {}
                }
            }
        }
        Self {
            doors,
            movers,
            doors_open: false,
            slide_dir: 1.0,
        }
    }

    fn step(&mut self, map: &mut Map, dt: f32) {
        let door_target = if self.doors_open { 1.0 } else { 0.0 };
        for &(x, y) in &self.doors {
            if let Some(tile) = map.tile_at_mut(x, y) {
                let cur = tile.render_state().to_f32();
                let next = if cur < door_target {
                    (cur + DOOR_SPEED * dt).min(door_target)
                } else {
                    (cur - DOOR_SPEED * dt).max(door_target)
                };
                tile.set_render_state(Fixed::from_f32(next));
            }
        }

        let mut bounced = false;
        for &(x, y) in &self.movers {
            if let Some(tile) = map.tile_at_mut(x, y) {
                let next = tile.render_state().to_f32() + self.slide_dir * SLIDE_SPEED * dt;
                bounced |= !(0.0..=0.9).contains(&next);
                tile.set_render_state(Fixed::from_f32(next.clamp(0.0, 0.9)));
            }
        }
        if bounced {
            self.slide_dir = -self.slide_dir;
        }
    }
}

/// Move unless the destination cell blocks.
fn try_move(map: &mut Map, camera: &mut Camera, forward: f32, side: f32) {
    let mut next = *camera;
    next.step(forward, side);
    let (tx, ty) = next.tile();
    if map.tile_at(tx, ty).is_some_and(|t| !t.is_solid()) {
        *camera = next;
        map.move_entity(map.player_id(), next.pos());
        map.set_entity_direction(map.player_id(), next.direction_degrees());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    let bank = build_bank()?;
    let mut map = build_map(&bank)?;
    let mut anim = Animations::scan(&map);

    let mut renderer = Software::new(&bank)?;
    renderer.set_map(&map, &bank)?;
    renderer.set_depth_shading_enabled(!opts.no_depth_shading);
    renderer.set_background(Some(sky(512, 128)));

    let mut win = Window::new(
        "Fixed-point ray caster",
        opts.width,
        opts.height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(opts.fps);

    tracing::info!(
        width = opts.width,
        height = opts.height,
        doors = anim.doors.len(),
        movers = anim.movers.len(),
        "viewer started"
    );

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last_frame.elapsed().as_secs_f32().min(0.1);
        last_frame = Instant::now();

        /* input ------------------------------------------------------------ */
        let run = if win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift) {
            2.0
        } else {
            1.0
        };
        let mut camera = *renderer.camera();
        let mut forward = 0.0;
        let mut side = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= 1.0;
        }
        if win.is_key_down(Key::A) {
            side -= 1.0;
        }
        if win.is_key_down(Key::D) {
            side += 1.0;
        }
        if win.is_key_down(Key::Left) {
            camera.turn(TURN_SPEED * dt);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-TURN_SPEED * dt);
        }
        let step = MOVE_SPEED * run * dt;
        try_move(&mut map, &mut camera, forward * step, 0.0);
        try_move(&mut map, &mut camera, 0.0, side * step);
        renderer.set_camera(camera);

        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            anim.doors_open = !anim.doors_open;
            tracing::debug!(open = anim.doors_open, "doors toggled");
        }
        if win.is_key_pressed(Key::T, KeyRepeat::No) {
            let enabled = !renderer.is_depth_shading_enabled();
            renderer.set_depth_shading_enabled(enabled);
            tracing::info!(enabled, "depth shading");
        }

        /* world between frames --------------------------------------------- */
        anim.step(&mut map, dt);

        /* draw ------------------------------------------------------------- */
        let (w, h) = win.get_size();
        let t0 = Instant::now();
        let mut shown = Ok(());
        renderer.draw_frame(w, h, &map, &bank, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            tracing::info!(avg_ms, fps = 1000.0 / avg_ms, "avg render");
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
