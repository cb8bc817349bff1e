//! Shared fixtures: a temp directory holding a registry file, a copy of the
//! shipped templates and a config file pointing at both.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use chnroutes::assets::DirAssets;
use chnroutes::service::RouteService;
use chnroutes::snapshot::SnapshotManager;

pub const REGISTRY: &str = "\
2|apnic|20240101|71234|19830613|20231231|+1000
apnic|*|ipv4|*|45678|summary
apnic|CN|ipv4|1.0.1.0|256|20110414|allocated
apnic|JP|ipv4|1.0.16.0|4096|20110412|allocated
apnic|CN|ipv4|1.0.2.0|512|20110414|allocated
apnic|CN|ipv4|1.0.8.0|768|20110412|allocated
apnic|CN|ipv6|2001:250::|35|20000426|allocated
";

pub const DLL_BYTES: &[u8] = &[0x4d, 0x5a, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00];

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("apnic.txt"), REGISTRY).unwrap();
        copy_templates(&dir.path().join("templates"));

        let config = format!(
            "bind: 127.0.0.1:0\nregistry: {}\nassets_dir: {}\nwatch: false\n",
            dir.path().join("apnic.txt").display(),
            dir.path().join("templates").display()
        );
        std::fs::write(dir.path().join("config.yaml"), config).unwrap();

        Self { dir }
    }

    /// Fixture with the Windows helper DLL present.
    pub fn with_dll() -> Self {
        let fixture = Self::new();
        fixture.write_asset("windows/cmroute.dll", DLL_BYTES);
        fixture
    }

    pub fn registry(&self) -> PathBuf {
        self.dir.path().join("apnic.txt")
    }

    pub fn assets(&self) -> PathBuf {
        self.dir.path().join("templates")
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("config.yaml")
    }

    pub fn write_asset(&self, rel: &str, content: &[u8]) {
        std::fs::write(self.assets().join(rel), content).unwrap();
    }

    pub fn service(&self) -> RouteService {
        let snapshots = SnapshotManager::open(self.registry(), "CN", false).unwrap();
        RouteService::new(Arc::new(snapshots), Arc::new(DirAssets::new(self.assets())))
    }
}

fn copy_templates(dest: &Path) {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    for platform in std::fs::read_dir(&src).unwrap() {
        let platform = platform.unwrap().path();
        let target = dest.join(platform.file_name().unwrap());
        std::fs::create_dir_all(&target).unwrap();
        for file in std::fs::read_dir(&platform).unwrap() {
            let file = file.unwrap().path();
            std::fs::copy(&file, target.join(file.file_name().unwrap())).unwrap();
        }
    }
}

pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}
