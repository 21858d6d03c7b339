//! Installing a freshly composed mesh into a live consumer.
//!
//! A renderer may still be reading the previous buffers when a new mesh is
//! ready. [`install_mesh`] drains in-flight work before swapping, so the old
//! buffers are never released while referenced.

use crate::mesh::AssembledMesh;

/// Something that reads an [`AssembledMesh`] concurrently with assembly.
pub trait MeshConsumer {
    /// Block until no pending work references the current mesh.
    fn drain_in_flight(&mut self);

    /// Take ownership of `mesh`, releasing the previous one.
    fn replace_mesh(&mut self, mesh: AssembledMesh);
}

/// Hand `mesh` to `consumer`: drain first, then replace.
pub fn install_mesh<C: MeshConsumer + ?Sized>(consumer: &mut C, mesh: AssembledMesh) {
    log::debug!(
        "Installing mesh: {} vertices, {} sections",
        mesh.vertex_count(),
        mesh.sections.len()
    );
    consumer.drain_in_flight();
    consumer.replace_mesh(mesh);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{compose, ComposeConfig};
    use crate::skeleton::{Skeleton, SkeletonBone};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        in_flight: usize,
        mesh: Option<AssembledMesh>,
    }

    impl MeshConsumer for Recorder {
        fn drain_in_flight(&mut self) {
            self.in_flight = 0;
            self.calls.push("drain");
        }

        fn replace_mesh(&mut self, mesh: AssembledMesh) {
            assert_eq!(self.in_flight, 0, "mesh replaced while frames in flight");
            self.mesh = Some(mesh);
            self.calls.push("replace");
        }
    }

    #[test]
    fn test_drain_before_replace() {
        let skeleton = Skeleton::new(vec![SkeletonBone::new("root", None)]).unwrap();
        let mesh = compose(&[], &skeleton, &ComposeConfig::default())
            .unwrap()
            .mesh;

        let mut recorder = Recorder {
            in_flight: 2,
            ..Default::default()
        };
        install_mesh(&mut recorder, mesh);
        assert_eq!(recorder.calls, vec!["drain", "replace"]);
        assert!(recorder.mesh.is_some());
    }

    #[test]
    fn test_install_through_trait_object() {
        let skeleton = Skeleton::new(vec![SkeletonBone::new("root", None)]).unwrap();
        let mesh = compose(&[], &skeleton, &ComposeConfig::default())
            .unwrap()
            .mesh;
        let mut recorder = Recorder::default();
        let consumer: &mut dyn MeshConsumer = &mut recorder;
        install_mesh(consumer, mesh);
        assert_eq!(recorder.calls, vec!["drain", "replace"]);
    }
}
