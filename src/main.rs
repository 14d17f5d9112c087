//! rTeamline main entrypoint.

use rteamline::run;
use rteamline::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
