//! `capstan pin` command

use anyhow::Result;

use crate::cli::PinArgs;
use capstan::ops::pin_reference;
use capstan::sources::GithubRefSource;
use capstan::util::CancelToken;

pub fn execute(args: PinArgs) -> Result<()> {
    let lookup = GithubRefSource::new(args.token)?;
    let cancel = CancelToken::new();

    let pin = pin_reference(&args.reference, &lookup, &cancel)?;

    println!("{}", pin.pin_line());
    Ok(())
}
