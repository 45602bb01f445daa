use clap::Parser;

/// BrowserStation control plane.
///
/// The API key is read from the `BROWSERSTATION_API_KEY` environment
/// variable; when set, every `/browsers` route demands a matching
/// `X-API-Key` header.
#[derive(Parser, Debug)]
#[command(name = "browserstation")]
#[command(about = "Control plane for a pool of headless Chromium workers")]
#[command(version)]
pub struct Cli {
	/// Address to bind on.
	#[arg(long, default_value = "0.0.0.0")]
	pub host: String,

	/// Port to serve on.
	#[arg(long, default_value_t = 8050)]
	pub port: u16,

	/// Require the API key on the WebSocket proxy route as well.
	///
	/// Off by default: CDP clients often cannot attach custom headers to
	/// their WebSocket handshakes.
	#[arg(long)]
	pub ws_auth: bool,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}
