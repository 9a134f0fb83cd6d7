use sysinfo::System;

/// Source of the local machine's host name
pub trait LocalIdentityProvider: Send + Sync {
    fn host_name(&self) -> Option<String>;
}

/// Asks the operating system through `sysinfo`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdentity;

impl LocalIdentityProvider for SystemIdentity {
    fn host_name(&self) -> Option<String> {
        System::host_name()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

/// Fixed host name, for hosts where the OS answer is wrong or unavailable
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Option<String>);

impl LocalIdentityProvider for StaticIdentity {
    fn host_name(&self) -> Option<String> {
        self.0.clone()
    }
}
