//! Integration tests for render-backend attachment.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use trellis::{
        Gui, NodeId,
        backend::{BackendCall, BackendLog, RecordingBackend},
        error::Result,
        geom::Expanse,
        resources::MonospaceLoader,
        widgets::Frame,
    };

    /// Number of frames in the pool the operations act on.
    const POOL: usize = 6;

    /// One tree mutation.
    #[derive(Debug, Clone)]
    enum Op {
        /// Attach pool member `child` under pool member `parent`, or under
        /// the content layer when `parent == POOL`.
        Attach { parent: usize, child: usize },
        /// Detach a pool member from its parent.
        Detach(usize),
        /// Set a pool member's hidden flag.
        Hide(usize, bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0..=POOL, 0..POOL).prop_map(|(parent, child)| Op::Attach { parent, child }),
            2 => (0..POOL).prop_map(Op::Detach),
            1 => (0..POOL, any::<bool>()).prop_map(|(i, h)| Op::Hide(i, h)),
        ]
    }

    fn gui() -> (Gui, BackendLog) {
        let (backend, log) = RecordingBackend::new();
        let mut gui = Gui::new(backend, MonospaceLoader);
        gui.resize(Expanse::new(200.0, 200.0));
        (gui, log)
    }

    fn apply(gui: &mut Gui, pool: &[NodeId], op: &Op) {
        let core = &mut gui.core;
        match *op {
            Op::Attach { parent, child } => {
                let parent = pool.get(parent).copied().unwrap_or(core.content_id());
                // Cycles and double attachment are rejected; either way the
                // tree stays consistent.
                core.attach(parent, pool[child]).ok();
            }
            Op::Detach(i) => core.detach(pool[i]).unwrap(),
            Op::Hide(i, hidden) => {
                core.set_hidden(pool[i], hidden);
            }
        }
    }

    proptest! {
        #[test]
        fn rendering_tracks_reachability(ops in prop::collection::vec(op(), 1..40)) {
            let (mut gui, log) = gui();
            let pool: Vec<NodeId> = (0..POOL)
                .map(|_| gui.core.create_detached(Frame::new()).id())
                .collect();
            for op in &ops {
                apply(&mut gui, &pool, op);
                let mut rendering = 0;
                for id in &pool {
                    let node = gui.core.node(*id).unwrap();
                    prop_assert_eq!(node.rendering(), gui.core.is_reachable(*id));
                    prop_assert_eq!(node.handle().is_some(), node.rendering());
                    rendering += usize::from(node.rendering());
                }
                prop_assert_eq!(log.live(), rendering);
                prop_assert_eq!(log.stray_detaches(), 0);
            }
        }
    }

    #[test]
    fn detaching_a_subtree_releases_every_handle() -> Result<()> {
        let (mut gui, log) = gui();
        let outer = gui.add_content(Frame::new().padding(5.0))?;
        let inner = gui.core.add_child_to(outer, Frame::new().padding(5.0))?;
        gui.core.add_child_to(inner, Frame::new())?;
        gui.frame(None, Default::default())?;
        assert_eq!(log.live(), 3);

        log.clear();
        gui.core.detach(outer)?;
        assert_eq!(log.live(), 0);
        let detaches = log
            .calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Detach(_)))
            .count();
        assert_eq!(detaches, 3);

        gui.core.detach(outer)?;
        assert_eq!(log.calls().len(), 3);
        Ok(())
    }

    #[test]
    fn moved_nodes_get_updates_not_reattachment() -> Result<()> {
        let (mut gui, log) = gui();
        let frame = gui.add_content(Frame::new().fixed(10.0, 10.0))?;
        gui.frame(None, Default::default())?;
        log.clear();

        gui.core.with_layout_of(frame, |l| *l = l.fixed(20.0, 20.0))?;
        gui.frame(None, Default::default())?;
        let calls = log.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], BackendCall::Update(..)));

        log.clear();
        gui.frame(None, Default::default())?;
        assert!(log.calls().is_empty());
        Ok(())
    }
}
