//! Caller-owned inputs shared by every stage of one resolution.

use std::path::{Path, PathBuf};

use fxr_config::HostEnvironment;
use fxr_deps::current_rid;
use fxr_fs::FileSystem;

use crate::error::{Error, Result};

/// Directory beneath an install root holding shared frameworks.
pub const SHARED_DIR: &str = "shared";

/// Directory beneath an install root holding the runtime package store.
pub const STORE_DIR: &str = "store";

/// Everything a resolution needs to know about the host: where frameworks
/// are installed, which RID it runs as, and the environment snapshot.
///
/// Constructed per request; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct HostContext<F> {
    fs: F,
    install_roots: Vec<PathBuf>,
    rid: String,
    env: HostEnvironment,
    servicing_root: Option<PathBuf>,
    user_store: Option<PathBuf>,
    global_stores: Vec<PathBuf>,
}

impl<F: FileSystem> HostContext<F> {
    /// Context for an install rooted at `dotnet_root`, using the host RID,
    /// an empty environment and the per-user store under the home
    /// directory.
    pub fn new(fs: F, dotnet_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            install_roots: vec![dotnet_root.into()],
            rid: current_rid(),
            env: HostEnvironment::empty(),
            servicing_root: None,
            user_store: dirs::home_dir().map(|home| home.join(".dotnet").join(STORE_DIR)),
            global_stores: Vec::new(),
        }
    }

    /// Search `root` for frameworks after the roots already configured.
    pub fn with_install_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.install_roots.push(root.into());
        self
    }

    /// Resolve assets for `rid` instead of the running host's RID.
    pub fn with_rid(mut self, rid: impl Into<String>) -> Result<Self> {
        let rid = rid.into();
        if rid.trim().is_empty() || rid.contains(['/', '\\']) {
            return Err(Error::InvalidRid { rid });
        }
        self.rid = rid;
        Ok(self)
    }

    pub fn with_env(mut self, env: HostEnvironment) -> Self {
        self.env = env;
        self
    }

    /// Servicing root; takes precedence over `DOTNET_SERVICING`.
    pub fn with_servicing_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.servicing_root = Some(root.into());
        self
    }

    /// Replace the per-user store, or drop it with `None`.
    pub fn with_user_store(mut self, store: Option<PathBuf>) -> Self {
        self.user_store = store;
        self
    }

    /// Machine-wide store probed after every other store.
    pub fn with_global_store(mut self, store: impl Into<PathBuf>) -> Self {
        self.global_stores.push(store.into());
        self
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// The primary install root.
    pub fn dotnet_root(&self) -> &Path {
        &self.install_roots[0]
    }

    /// Install roots in search order, primary first.
    pub fn install_roots(&self) -> &[PathBuf] {
        &self.install_roots
    }

    pub fn rid(&self) -> &str {
        &self.rid
    }

    /// Architecture suffix of the RID, e.g. `x64` for `linux-x64`.
    pub fn arch(&self) -> &str {
        match self.rid.rsplit_once('-') {
            Some((_, arch)) if !arch.is_empty() => arch,
            _ => std::env::consts::ARCH,
        }
    }

    pub fn env(&self) -> &HostEnvironment {
        &self.env
    }

    pub fn servicing_root(&self) -> Option<PathBuf> {
        self.servicing_root
            .clone()
            .or_else(|| self.env.servicing_root())
    }

    /// Store roots in probe order: environment-declared, per-user,
    /// install-relative, then global.
    pub fn store_roots(&self) -> Vec<PathBuf> {
        let mut roots = self.env.shared_stores();
        roots.extend(self.user_store.clone());
        roots.push(self.dotnet_root().join(STORE_DIR));
        roots.extend(self.global_stores.iter().cloned());

        let mut unique = Vec::with_capacity(roots.len());
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        unique
    }

    /// `shared/<name>` beneath every install root, in search order.
    pub fn framework_roots(&self, name: &str) -> Vec<PathBuf> {
        self.install_roots
            .iter()
            .map(|root| root.join(SHARED_DIR).join(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxr_fs::HostFs;

    fn context() -> HostContext<HostFs> {
        HostContext::new(HostFs, "/usr/share/dotnet")
            .with_user_store(None)
            .with_rid("linux-x64")
            .unwrap()
    }

    #[test]
    fn arch_comes_from_rid_suffix() {
        assert_eq!(context().arch(), "x64");
        let ctx = context().with_rid("osx.10.12-arm64").unwrap();
        assert_eq!(ctx.arch(), "arm64");
    }

    #[test]
    fn empty_rid_is_rejected() {
        let err = context().with_rid("  ").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ConfigValidation);
    }

    #[test]
    fn store_roots_follow_precedence() {
        let env = HostEnvironment::empty().with_var(fxr_config::env::SHARED_STORE, "/env/store");
        let ctx = context()
            .with_env(env)
            .with_user_store(Some(PathBuf::from("/home/u/.dotnet/store")))
            .with_global_store("/global/store");
        assert_eq!(
            ctx.store_roots(),
            vec![
                PathBuf::from("/env/store"),
                PathBuf::from("/home/u/.dotnet/store"),
                PathBuf::from("/usr/share/dotnet/store"),
                PathBuf::from("/global/store"),
            ]
        );
    }

    #[test]
    fn explicit_servicing_root_beats_environment() {
        let env = HostEnvironment::empty().with_var(fxr_config::env::SERVICING, "/env/servicing");
        let ctx = context().with_env(env);
        assert_eq!(ctx.servicing_root(), Some(PathBuf::from("/env/servicing")));

        let ctx = ctx.with_servicing_root("/opt/servicing");
        assert_eq!(ctx.servicing_root(), Some(PathBuf::from("/opt/servicing")));
    }

    #[test]
    fn framework_roots_cover_every_install() {
        let ctx = context().with_install_root("/opt/dotnet");
        assert_eq!(
            ctx.framework_roots("Test.App"),
            vec![
                PathBuf::from("/usr/share/dotnet/shared/Test.App"),
                PathBuf::from("/opt/dotnet/shared/Test.App"),
            ]
        );
    }
}
