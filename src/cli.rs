//! Command-line interface and REPL
//!
//! Development shell standing in for the graphical front-end: each
//! command pokes the same store slices and bindings the UI would.

use crate::components::{CanvasBinding, ControlPanelBinding};
use crate::effects::PipelineBuilder;
use crate::engine::{ConsoleEngine, Engine};
use crate::store::{EffectFlags, KeyedStore, PlaybackOptions, RomCollectionSlice, StoreKey};
use anyhow::Result;
use rustyline::DefaultEditor;
use serde_json::json;
use std::sync::Arc;

/// Everything the REPL commands act on
pub struct ReplContext {
    pub store: Arc<KeyedStore>,
    pub engine: Arc<ConsoleEngine>,
    pub canvas: Arc<CanvasBinding>,
    pub panel: Arc<ControlPanelBinding>,
}

pub async fn run_repl(ctx: ReplContext) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("VaporBoy shell. Type 'help' for commands.");

    loop {
        let readline = rl.readline("vaporboy> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if line == "exit" || line == "quit" {
                    break;
                }
                if let Err(e) = dispatch(&ctx, line).await {
                    println!("error: {e:#}");
                }
            }
            Err(_) => break,
        }
    }

    Ok(())
}

async fn dispatch(ctx: &ReplContext, line: &str) -> Result<()> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "help" => print_help(),
        "show" => show(ctx).await,
        "roms" => {
            let collection: RomCollectionSlice = ctx.store.get_as(StoreKey::RomCollection);
            if collection.roms.is_empty() {
                println!("collection is empty");
            }
            for rom in &collection.roms {
                println!("  {}", rom.title);
            }
        }
        "load" => {
            let title = if args.is_empty() {
                "Unknown Cartridge".to_string()
            } else {
                args.join(" ")
            };
            ctx.engine.load_rom(&title);
            ctx.canvas.reconfigure().await?;
            ctx.panel.resume().await?;
        }
        "effects" => {
            let (name, state) = match args.as_slice() {
                [name, state] => (*name, *state),
                _ => {
                    println!("usage: effects <name> <on|off>");
                    return Ok(());
                }
            };
            if !PipelineBuilder::known_effects().iter().any(|e| *e == name) {
                println!(
                    "unknown effect '{}' (known: {})",
                    name,
                    PipelineBuilder::known_effects().join(", ")
                );
                // Unknown names are still merged; the builder ignores them
            }
            let mut patch = serde_json::Map::new();
            patch.insert(name.to_string(), serde_json::Value::Bool(state == "on"));
            ctx.store
                .set(StoreKey::Effects, serde_json::Value::Object(patch));
        }
        "framerate" => match args.first().and_then(|v| v.parse::<u32>().ok()) {
            Some(rate) => ctx.store.set(StoreKey::Options, json!({ "frameRate": rate })),
            None => println!("usage: framerate <fps>"),
        },
        "save" => {
            if !ctx.panel.can_save() {
                println!("save disabled: no ROM loaded");
                return Ok(());
            }
            let record = ctx.panel.save_state().await?;
            println!("saved slot {}", record.slot);
        }
        "pause" => {
            if !ctx.panel.can_save() {
                println!("pause disabled: no ROM loaded");
                return Ok(());
            }
            ctx.panel.pause().await?;
        }
        "resume" => {
            if !ctx.panel.can_save() {
                println!("resume disabled: no ROM loaded");
                return Ok(());
            }
            ctx.panel.resume().await?;
        }
        _ => println!("unknown command '{command}', try 'help'"),
    }
    Ok(())
}

async fn show(ctx: &ReplContext) {
    let options: PlaybackOptions = ctx.store.get_as(StoreKey::Options);
    let effects: EffectFlags = ctx.store.get_as(StoreKey::Effects);
    println!(
        "engine:  ready={} playing={}",
        ctx.engine.is_ready(),
        ctx.engine.is_playing()
    );
    println!("options: {options:?}");
    println!("effects: {effects:?}");
    println!("classes: {}", ctx.canvas.canvas_classes().join(" "));
    match ctx.engine.last_chain_names().await {
        Some((audio, video)) => {
            println!("audio chain: [{}]", audio.join(" -> "));
            println!("video chain: [{}]", video.join(" -> "));
        }
        None => println!("no configuration installed yet"),
    }
}

fn print_help() {
    println!("commands:");
    println!("  show                    current options, effects, and chains");
    println!("  roms                    list the ROM collection");
    println!("  load [title]            insert a cartridge and start playing");
    println!("  effects <name> <on|off> toggle an effect");
    println!("  framerate <fps>         set the target frame rate");
    println!("  save                    capture a save state");
    println!("  pause / resume          control playback");
    println!("  exit                    quit");
}
