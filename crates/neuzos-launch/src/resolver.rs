//! Launch mode resolution
//!
//! Start parameters come as `--mode=<mode>` and `--session_id=<id>`. Any
//! other argument, and any unrecognized mode value, is ignored so the
//! process can still be started by tools that pass their own flags.

use neuzos_config::Config;
use neuzos_window::StandaloneMode;

use crate::error::LaunchError;
use crate::mode::LaunchMode;
use crate::Result;

const MODE_FLAG: &str = "--mode=";
const SESSION_ID_FLAG: &str = "--session_id=";

/// Raw values picked out of the argument list. Later occurrences win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchArgs {
    pub mode: Option<String>,
    pub session_id: Option<String>,
}

impl LaunchArgs {
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = LaunchArgs::default();
        for arg in args {
            let arg = arg.as_ref();
            if let Some(value) = arg.strip_prefix(MODE_FLAG) {
                parsed.mode = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix(SESSION_ID_FLAG) {
                parsed.session_id = Some(value.to_string()).filter(|v| !v.is_empty());
            }
        }
        parsed
    }
}

/// The resolved start-up behavior of this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub mode: LaunchMode,
    pub session_id: Option<String>,
}

impl LaunchPlan {
    pub fn normal() -> Self {
        Self {
            mode: LaunchMode::Normal,
            session_id: None,
        }
    }

    /// Plan for a child process hosting one session.
    pub fn for_session(mode: LaunchMode, session_id: impl Into<String>) -> Result<Self> {
        if !mode.is_session_bound() {
            return Err(LaunchError::NotSessionMode(mode));
        }
        Ok(Self {
            mode,
            session_id: Some(session_id.into()),
        })
    }

    /// The standalone mode and session id, for session-bound plans.
    pub fn standalone(&self) -> Option<(StandaloneMode, &str)> {
        let mode = self.mode.standalone_mode()?;
        let session_id = self.session_id.as_deref()?;
        Some((mode, session_id))
    }

    /// Arguments that make a fresh process resolve to this plan.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![format!("{}{}", MODE_FLAG, self.mode)];
        if let Some(session_id) = &self.session_id {
            args.push(format!("{}{}", SESSION_ID_FLAG, session_id));
        }
        args
    }
}

/// Resolve the launch plan from process arguments and the loaded config.
///
/// An explicit, recognized `--mode` wins. Otherwise the configured default
/// is used if it is `normal` or `session_launcher`, and `normal` if not.
/// Session-bound modes without a session id are an error.
pub fn resolve<I, S>(args: I, config: &Config) -> Result<LaunchPlan>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args = LaunchArgs::parse(args);

    let explicit = args.mode.as_deref().and_then(|raw| match raw.parse::<LaunchMode>() {
        Ok(mode) => Some(mode),
        Err(_) => {
            tracing::warn!(mode = raw, "Ignoring unrecognized launch mode");
            None
        }
    });

    let mode = explicit.unwrap_or_else(|| {
        let configured = &config.launch_defaults.default_launch_mode;
        match configured.parse::<LaunchMode>() {
            Ok(mode) if mode.allowed_as_default() => mode,
            _ => {
                if configured.as_str() != LaunchMode::Normal.as_str() {
                    tracing::debug!(
                        mode = %configured,
                        "Configured launch mode not usable as a default"
                    );
                }
                LaunchMode::Normal
            }
        }
    });

    if mode.is_session_bound() && args.session_id.is_none() {
        return Err(LaunchError::MissingSessionId(mode));
    }

    tracing::info!(mode = %mode, session_id = ?args.session_id, "Resolved launch mode");
    Ok(LaunchPlan {
        mode,
        session_id: args.session_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_default(mode: &str) -> Config {
        let mut config = Config::default();
        config.launch_defaults.default_launch_mode = mode.to_string();
        config
    }

    #[test]
    fn test_explicit_mode_wins() {
        let plan = resolve(
            ["neuzos", "--mode=focus", "--session_id=s1"],
            &config_default("session_launcher"),
        )
        .unwrap();
        assert_eq!(plan.mode, LaunchMode::Focus);
        assert_eq!(plan.session_id.as_deref(), Some("s1"));
        assert_eq!(plan.standalone(), Some((StandaloneMode::Focus, "s1")));
    }

    #[test]
    fn test_unrecognized_mode_falls_back_to_default() {
        let plan = resolve(["--mode=turbo"], &config_default("session_launcher")).unwrap();
        assert_eq!(plan.mode, LaunchMode::SessionLauncher);
    }

    #[test]
    fn test_session_bound_default_is_never_used() {
        for mode in ["session", "focus", "focus_fullscreen", "garbage", ""] {
            let plan = resolve(Vec::<String>::new(), &config_default(mode)).unwrap();
            assert_eq!(plan.mode, LaunchMode::Normal, "default {:?}", mode);
        }
    }

    #[test]
    fn test_session_bound_mode_needs_session_id() {
        let err = resolve(["--mode=focus_fullscreen"], &Config::default()).unwrap_err();
        assert_eq!(err, LaunchError::MissingSessionId(LaunchMode::FocusFullscreen));

        let err = resolve(["--mode=session", "--session_id="], &Config::default()).unwrap_err();
        assert_eq!(err, LaunchError::MissingSessionId(LaunchMode::Session));
    }

    #[test]
    fn test_session_id_without_session_mode_is_kept() {
        let plan = resolve(["--session_id=s1"], &Config::default()).unwrap();
        assert_eq!(plan.mode, LaunchMode::Normal);
        assert_eq!(plan.standalone(), None);
    }

    #[test]
    fn test_other_arguments_are_ignored() {
        let plan = resolve(
            ["--inspect", "mode=focus", "--mode", "focus"],
            &Config::default(),
        )
        .unwrap();
        assert_eq!(plan, LaunchPlan::normal());
    }

    #[test]
    fn test_plan_args_resolve_back() {
        let plan = LaunchPlan::for_session(LaunchMode::FocusFullscreen, "s 1").unwrap();
        let args = plan.to_args();
        assert_eq!(args, vec!["--mode=focus_fullscreen", "--session_id=s 1"]);
        assert_eq!(resolve(&args, &Config::default()).unwrap(), plan);
    }

    #[test]
    fn test_for_session_rejects_window_modes() {
        assert_eq!(
            LaunchPlan::for_session(LaunchMode::Normal, "s1"),
            Err(LaunchError::NotSessionMode(LaunchMode::Normal))
        );
    }
}
