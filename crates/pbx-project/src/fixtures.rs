/// A minimal application project in the exact layout the IDE writes.
pub(crate) const SAMPLE: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 56;
	objects = {

/* Begin PBXBuildFile section */
		A1 /* main.swift in Sources */ = {isa = PBXBuildFile; fileRef = F1 /* main.swift */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
		F1 /* main.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = main.swift; sourceTree = "<group>"; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
		G1 = {
			isa = PBXGroup;
			children = (
				F1 /* main.swift */,
			);
			sourceTree = "<group>";
		};
/* End PBXGroup section */

/* Begin PBXNativeTarget section */
		T1 /* App */ = {
			isa = PBXNativeTarget;
			buildPhases = (
				P1 /* Sources */,
			);
			buildRules = (
			);
			dependencies = (
			);
			name = App;
			productType = "com.apple.product-type.application";
		};
/* End PBXNativeTarget section */

/* Begin PBXProject section */
		R1 /* Project object */ = {
			isa = PBXProject;
			hasScannedForEncodings = 0;
			mainGroup = G1;
			projectDirPath = "";
			projectRoot = "";
			targets = (
				T1 /* App */,
			);
		};
/* End PBXProject section */

/* Begin PBXSourcesBuildPhase section */
		P1 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
				A1 /* main.swift in Sources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXSourcesBuildPhase section */
	};
	rootObject = R1 /* Project object */;
}
"#;
