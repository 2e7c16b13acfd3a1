use std::path::PathBuf;

use arnold_core::core::machine::Machine;
use arnold_core::device::gate_array::ScanMode;
use arnold_machines::cpc::{Cpc, Model, RomVariant, StereoMode};
use arnold_machines::rom_loader::RomSet;
use clap::Parser;

mod audio;
mod config;
mod emulator;
mod input;
mod screenshot;
mod video;

/// Amstrad CPC emulator.
#[derive(Parser, Debug)]
#[command(name = "arnold", version, about)]
struct Args {
    /// Machine model: cpc464, cpc664 or cpc6128
    #[arg(long)]
    model: Option<String>,

    /// Directory containing the firmware ROM images
    #[arg(long)]
    rom_dir: Option<PathBuf>,

    /// Firmware locale: en, es or fr
    #[arg(long, default_value = "en")]
    locale: String,

    /// CRTC type (0-4)
    #[arg(long)]
    crtc: Option<u8>,

    /// Stereo mode: mono, abc or acb
    #[arg(long)]
    stereo: Option<String>,

    /// PSG chip: ay or ym
    #[arg(long)]
    psg: Option<String>,

    /// Scan mode: none, scanlines or average
    #[arg(long)]
    scan_mode: Option<String>,

    /// Window scale factor
    #[arg(long)]
    scale: Option<u32>,

    /// Disable all sound output
    #[arg(long)]
    no_sound: bool,

    /// Disable the tape sound feed
    #[arg(long)]
    no_tape_sound: bool,

    /// Pace emulation by the host display instead of a timer
    #[arg(long)]
    sync_to_video: bool,

    /// Write the effective settings back to the config file and exit
    #[arg(long)]
    save_config: bool,
}

fn main() {
    let args = Args::parse();
    let mut cfg = config::load();

    if let Some(model) = args.model {
        cfg.model = model;
    }
    if let Some(dir) = args.rom_dir {
        cfg.rom_dir = Some(dir);
    }
    if let Some(crtc) = args.crtc {
        cfg.crtc = crtc;
    }
    if let Some(stereo) = args.stereo {
        cfg.stereo = stereo;
    }
    if let Some(psg) = args.psg {
        cfg.psg = psg;
    }
    if let Some(scan) = args.scan_mode {
        cfg.scan_mode = scan;
    }
    if let Some(scale) = args.scale {
        cfg.scale = scale.max(1);
    }
    if args.no_sound {
        cfg.sound = false;
    }
    if args.no_tape_sound {
        cfg.tape_sound = false;
    }
    if args.sync_to_video {
        cfg.sync_to_video = true;
    }

    if args.save_config {
        if let Err(e) = config::save(&cfg) {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
        println!("Configuration saved.");
        return;
    }

    let model = match cfg.model.as_str() {
        "cpc464" => Model::Cpc464,
        "cpc664" => Model::Cpc664,
        "cpc6128" => Model::Cpc6128,
        other => {
            eprintln!("Unknown model: {other}");
            eprintln!("Available: cpc464, cpc664, cpc6128");
            std::process::exit(1);
        }
    };

    let variant = match args.locale.as_str() {
        "es" => RomVariant::Spanish,
        "fr" => RomVariant::French,
        _ => RomVariant::English,
    };

    let rom_dir = cfg.rom_dir.clone().unwrap_or_else(|| PathBuf::from("roms"));
    println!("Loading ROMs from {}...", rom_dir.display());
    let rom_set = match RomSet::from_directory(&rom_dir) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Failed to read ROM directory: {e}");
            std::process::exit(1);
        }
    };

    let mut cpc = Cpc::new(model);
    if let Err(e) = cpc.load_rom_set(&rom_set, variant) {
        eprintln!("Failed to load firmware: {e}");
        std::process::exit(1);
    }
    println!("Model: {}", cfg.model);

    cpc.set_crtc_type(cfg.crtc.min(4));
    println!("CRTC type: {}", cfg.crtc.min(4));

    cpc.set_stereo(match cfg.stereo.as_str() {
        "abc" => StereoMode::Abc,
        "acb" => StereoMode::Acb,
        _ => StereoMode::Mono,
    });
    cpc.set_psg_chip(cfg.psg != "ym");
    cpc.set_scan_mode(match cfg.scan_mode.as_str() {
        "scanlines" => ScanMode::Scanlines,
        "average" => ScanMode::Average,
        _ => ScanMode::Single,
    });
    cpc.set_psg_sound(cfg.sound);
    cpc.set_tape_sound(cfg.sound && cfg.tape_sound);

    let key_map = input::default_key_map(cpc.input_map());
    cpc.reset();
    emulator::run(&mut cpc, &key_map, &cfg);
}
