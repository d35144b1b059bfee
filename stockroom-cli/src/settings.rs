//! `stockroom settings`

use anyhow::{Result, bail};
use clap::Subcommand;
use stockroom_lib::settings::{SIDEBAR_GROUPS, SettingsContext, Theme};

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print every setting
    Show,
    /// Set the theme, or switch it when no theme is given
    Theme { theme: Option<Theme> },
    /// Turn quiet mode on or off
    Quiet {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Toggle the sidebar, one sidebar group, or every group with `all`
    Sidebar { group: Option<String> },
}

pub async fn run(ctx: &mut SettingsContext, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {}
        SettingsAction::Theme { theme: Some(theme) } => ctx.set_theme(theme).await,
        SettingsAction::Theme { theme: None } => {
            ctx.toggle_theme().await;
        }
        SettingsAction::Quiet { enabled } => ctx.set_quiet_mode(enabled).await,
        SettingsAction::Sidebar { group: None } => {
            let collapsed = !ctx.sidebar_collapsed();
            ctx.set_sidebar_collapsed(collapsed).await;
        }
        SettingsAction::Sidebar { group: Some(group) } if group == "all" => {
            ctx.toggle_all_sidebar_groups().await;
        }
        SettingsAction::Sidebar { group: Some(group) } => {
            if !SIDEBAR_GROUPS.contains(&group.as_str()) {
                bail!(
                    "unknown sidebar group '{}' (expected all or one of: {})",
                    group,
                    SIDEBAR_GROUPS.join(", ")
                );
            }
            ctx.toggle_sidebar_group(&group).await;
        }
    }
    print(ctx);
    Ok(())
}

fn print(ctx: &SettingsContext) {
    let settings = ctx.settings();
    println!("theme              {}", settings.theme);
    println!("quiet mode         {}", on_off(settings.quiet_mode));
    println!("sidebar collapsed  {}", on_off(settings.sidebar_collapsed));
    for group in SIDEBAR_GROUPS {
        let state = if settings.is_group_collapsed(group) {
            "collapsed"
        } else {
            "expanded"
        };
        println!("  {:<16} {}", group, state);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
