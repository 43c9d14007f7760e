use yew::prelude::*;

// Rotating cacao pod drawn with Three.js. Purely decorative.
const COCOA_POD_SCENE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <script src="https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js"></script>
    <style>
      body { margin: 0; overflow: hidden; }
      canvas { display: block; }
    </style>
  </head>
  <body>
    <script>
      var scene = new THREE.Scene();
      var camera = new THREE.PerspectiveCamera(75, window.innerWidth / window.innerHeight, 0.1, 1000);
      var renderer = new THREE.WebGLRenderer();
      renderer.setSize(window.innerWidth, window.innerHeight);
      document.body.appendChild(renderer.domElement);

      var geometry = new THREE.CylinderGeometry(2, 2, 6, 32);
      var material = new THREE.MeshBasicMaterial({ color: 0x8b4513 });
      var cocoaPod = new THREE.Mesh(geometry, material);
      scene.add(cocoaPod);

      var light = new THREE.PointLight(0xffffff, 1, 100);
      light.position.set(10, 10, 10);
      scene.add(light);

      camera.position.z = 10;

      function animate() {
        requestAnimationFrame(animate);
        cocoaPod.rotation.x += 0.01;
        cocoaPod.rotation.y += 0.01;
        renderer.render(scene, camera);
      }
      animate();

      window.addEventListener("resize", function () {
        renderer.setSize(window.innerWidth, window.innerHeight);
        camera.aspect = window.innerWidth / window.innerHeight;
        camera.updateProjectionMatrix();
      });
    </script>
  </body>
</html>"#;

pub fn render_scene() -> Html {
    html! {
        <iframe
            class="pod-scene"
            title="Cacao pod"
            srcdoc={COCOA_POD_SCENE}
            sandbox="allow-scripts"
        />
    }
}
