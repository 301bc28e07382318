use crate::CLAP_STYLING;
use clap::{Arg, arg, command};
use std::path::PathBuf;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("gramscope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("gramscope")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Creates the gramscope dataset and default config on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory holding the dataset and config")
                        .default_value("~/.config/gramscope/"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite any existing dataset and config at the location")
                        .required(false),
                ),
        )
        .subcommand(
            command!("extract")
                .about("Turns saved page payloads into normalized records")
                .arg(
                    arg!(-t --"page-type" <PAGE_TYPE>)
                        .required(true)
                        .help("Classification of the pages: PLACE, PROFILE, HASHTAG or POST"),
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .num_args(1..)
                        .help("Saved shared-data JSON of one or more pages")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("URL the payloads were loaded from (default: the file path)"),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Scrape config JSON (default: ~/.config/gramscope/config.json if present)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-d --"dataset" <PATH>)
                        .required(false)
                        .help("Persist records to this dataset instead of printing JSON lines")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"session-id" <ID>)
                        .required(false)
                        .help("Logged-in sessionid cookie used for follower and story queries"),
                )
                .arg(
                    arg!(--"include-has-stories")
                        .required(false)
                        .help("Look up whether a profile currently has a public story")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"following-max" <N>)
                        .required(false)
                        .help("Maximum followed accounts to collect per profile")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"followed-by-max" <N>)
                        .required(false)
                        .help("Maximum followers to collect per profile")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"likers-max" <N>)
                        .required(false)
                        .help("Maximum likers to collect per post")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            command!("enqueue")
                .about("Schedules profiles for a later scrape")
                .arg(
                    Arg::new("USERNAME")
                        .required(true)
                        .num_args(1..)
                        .help("Usernames to queue"),
                )
                .arg(
                    arg!(-d --"dataset" <PATH>)
                        .required(false)
                        .help("Dataset holding the queue (default: ~/.config/gramscope/gramscope.db)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            command!("queue").about("Lists pending requests").arg(
                arg!(-d --"dataset" <PATH>)
                    .required(false)
                    .help("Dataset holding the queue (default: ~/.config/gramscope/gramscope.db)")
                    .value_parser(clap::value_parser!(PathBuf)),
            ),
        )
}
