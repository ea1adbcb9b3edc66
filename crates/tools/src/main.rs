use std::env;
use std::fs;
use std::path::PathBuf;

use formats::{RenderSpec, RouteEntry, RouteManifest};
use foundation::{RouteParams, placeholders, template};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 3 || args[1] != "routes" {
        return Err(usage());
    }

    let cmd = args[2].clone();
    args.drain(0..3);

    match cmd.as_str() {
        "check" => cmd_routes_check(args),
        "hash" => cmd_routes_hash(args),
        _ => Err(usage()),
    }
}

#[derive(Debug, Default)]
struct CheckArgs {
    manifest: PathBuf,
    route: Option<String>,
    params: Option<RouteParams>,
}

fn parse_check_args(args: Vec<String>) -> Result<CheckArgs, String> {
    // atlas routes check <manifest.json> [--route ID] [--param key=value ...]
    let mut out = CheckArgs::default();
    let mut manifest: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--route" => {
                i += 1;
                let id = args.get(i).ok_or("--route requires a value")?;
                out.route = Some(id.clone());
            }
            "--param" => {
                i += 1;
                let pair = args.get(i).ok_or("--param requires key=value")?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("--param expects key=value, got {pair}"))?;
                out.params
                    .get_or_insert_with(RouteParams::new)
                    .insert(key, value);
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            s => {
                if manifest.is_some() {
                    return Err(format!("unexpected arg: {s}\n\n{}", usage()));
                }
                manifest = Some(PathBuf::from(s));
            }
        }
        i += 1;
    }

    out.manifest = manifest.ok_or_else(usage)?;
    Ok(out)
}

/// Problems found in one route: unsupported render shapes, and templates that
/// cannot be formatted with `params` when params are given.
fn check_route(route: &RouteEntry, params: Option<&RouteParams>) -> Vec<String> {
    let mut problems = Vec::new();
    if let RenderSpec::Other(value) = &route.render {
        problems.push(format!("{}: render value not compatible: {value}", route.id));
    }
    if let Some(params) = params {
        for (field, text) in route.templates() {
            if let Err(e) = template::format(text, params) {
                problems.push(format!("{}: {field}: {e}", route.id));
            }
        }
    }
    problems
}

fn cmd_routes_check(args: Vec<String>) -> Result<(), String> {
    let args = parse_check_args(args)?;
    let manifest = RouteManifest::load(&args.manifest)
        .map_err(|e| format!("load {:?}: {e}", args.manifest))?;

    let routes: Vec<&RouteEntry> = match &args.route {
        Some(id) => vec![
            manifest
                .route(id)
                .ok_or_else(|| format!("unknown route: {id}"))?,
        ],
        None => manifest.routes.iter().collect(),
    };

    let mut problems = Vec::new();
    for route in &routes {
        let mut names: Vec<&str> = route
            .templates()
            .into_iter()
            .flat_map(|(_, text)| placeholders(text))
            .collect();
        names.sort_unstable();
        names.dedup();
        println!(
            "{}\tview={}\tparams=[{}]",
            route.id,
            route.view_id.as_deref().unwrap_or("-"),
            names.join(",")
        );
        problems.extend(check_route(route, args.params.as_ref()));
    }

    if problems.is_empty() {
        println!("ok: {} route(s)", routes.len());
        return Ok(());
    }
    for p in &problems {
        eprintln!("{p}");
    }
    Err(format!("{} problem(s) found", problems.len()))
}

fn cmd_routes_hash(args: Vec<String>) -> Result<(), String> {
    // atlas routes hash <manifest.json>
    let [path] = args.as_slice() else {
        return Err(usage());
    };
    let path = PathBuf::from(path);

    let mut manifest =
        RouteManifest::load(&path).map_err(|e| format!("load {path:?}: {e}"))?;
    manifest
        .compute_and_set_identity()
        .map_err(|e| format!("hash: {e}"))?;

    let payload = serde_json::to_string_pretty(&manifest).map_err(|e| format!("json: {e}"))?;
    fs::write(&path, payload).map_err(|e| format!("write {path:?}: {e}"))?;
    println!("{}", manifest.content_hash.unwrap_or_default());
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "atlas".to_string());
    format!(
        "Usage:\n  {exe} routes check <routes.manifest.json> [--route ID] [--param key=value ...]\n  {exe} routes hash <routes.manifest.json>\n\nNotes:\n- `check` lists each route's view fragment and params, and fails on render values that are neither a path nor an object of paths.\n- With --param, every title, back target and render path is formatted and missing params are reported.\n- `hash` writes the manifest's `contentHash` in place.\n"
    )
}
