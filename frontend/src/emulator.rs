use std::time::{Duration, Instant};

use arnold_core::core::machine::Machine;
use arnold_machines::cpc::Cpc;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::audio;
use crate::config::Config;
use crate::input::KeyMap;
use crate::video::Video;

pub fn run(cpc: &mut Cpc, key_map: &KeyMap, cfg: &Config) {
    let sdl_context = sdl2::init().expect("Failed to initialize SDL2");
    let sdl_video = sdl_context.video().expect("Failed to init SDL video");
    let sdl_audio = sdl_context.audio().expect("Failed to init SDL audio");

    let (width, height) = cpc.display_size();
    let mut video = Video::new(&sdl_video, "Arnold", width, height, cfg.scale);
    let mut event_pump = sdl_context.event_pump().expect("Failed to get event pump");

    let audio_out = if cfg.sound {
        audio::init(&sdl_audio, cpc.audio_sample_rate())
    } else {
        None
    };
    let mut audio_started = false;

    let frame_duration = Duration::from_secs_f64(1.0 / cpc.frame_rate_hz());
    let mut framebuffer = vec![0u8; (width * height * 3) as usize];
    let mut samples = [0i16; 4096];

    'main: loop {
        let frame_start = Instant::now();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown { scancode: Some(Scancode::F11), .. } => {
                    cpc.reset();
                }

                Event::KeyDown { scancode: Some(Scancode::F12), .. } => {
                    cpc.render_frame(&mut framebuffer);
                    match crate::screenshot::save(&framebuffer, width, height) {
                        Ok(path) => println!("Screenshot: {}", path.display()),
                        Err(e) => eprintln!("Screenshot failed: {e}"),
                    }
                }

                Event::KeyDown { scancode: Some(sc), repeat: false, .. } => {
                    if let Some(key) = key_map.get(sc) {
                        cpc.set_input(key, true);
                    }
                }

                Event::KeyUp { scancode: Some(sc), .. } => {
                    if let Some(key) = key_map.get(sc) {
                        cpc.set_input(key, false);
                    }
                }

                _ => {}
            }
        }

        // Advance the machine: to the frame boundary normally, or by a
        // fixed slice when pacing against the host display.
        cpc.run(!cfg.sync_to_video);

        if let Some((device, ring)) = &audio_out {
            let written = cpc.fill_audio(&mut samples);
            if written > 0 {
                let mut buf = ring.lock().unwrap();
                buf.extend(&samples[..written]);
                if !audio_started {
                    device.resume();
                    audio_started = true;
                }
            }
        }

        cpc.render_frame(&mut framebuffer);
        video.present(&framebuffer);

        if !cfg.sync_to_video {
            // Sleep off the remainder of the emulated frame.
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
        // With sync_to_video the present() above blocks on the display's
        // vertical refresh instead.
    }
}
