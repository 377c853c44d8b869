use anyhow::{Context, Result};

use crate::{config::Profile, dependencies::AtlasClient};

/// Build a command from its arguments, the resolved profile and an Atlas client.
pub trait TryFromWithAtlasClient<T>: Sized {
    fn try_from_with_atlas_client(value: T, profile: &Profile, client: AtlasClient)
    -> Result<Self>;
}

/// Build a command with an Atlas client created from the profile.
pub trait WithAtlasClient<Args>: Sized {
    fn with_atlas_client(args: Args, profile: &Profile) -> Result<Self>;
}

impl<Args, T> WithAtlasClient<Args> for T
where
    T: TryFromWithAtlasClient<Args>,
{
    fn with_atlas_client(args: Args, profile: &Profile) -> Result<Self> {
        let client = AtlasClient::from_profile(profile).context("creating Atlas client")?;

        Self::try_from_with_atlas_client(args, profile, client)
    }
}
