// ─── packsmith Core ───
// Installs a CurseForge modpack into the stock Minecraft launcher.
//
// Architecture:
//   core/
//     source/      — --modpack / --location classification
//     catalog/     — Addon API client (lookups, byte fetches, streaming)
//     staging      — Temporary extraction directory, removed on drop
//     acquire      — Local zip or remote id → staging area
//     manifest     — manifest.json model
//     dependency   — Minecraft + loader version check, install-and-retry loop
//     downloader/  — Two-phase concurrent mod download
//     overrides    — Recursive overrides merge
//     profiles     — launcher_profiles.json registration
//     pipeline     — Stage sequencing and the overwrite check
//     platform     — Per-OS launcher paths and browser opening
//     interaction  — Blocking yes/no prompts
//     settings     — settings.json

pub mod acquire;
pub mod catalog;
pub mod dependency;
pub mod downloader;
pub mod error;
pub mod http;
pub mod interaction;
pub mod manifest;
pub mod overrides;
pub mod pipeline;
pub mod platform;
pub mod profiles;
pub mod settings;
pub mod source;
pub mod staging;
